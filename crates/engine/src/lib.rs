//! Conversation orchestration engine.
//!
//! Each inbound message runs through a fixed, ordered chain of stages; the
//! first stage that handles the message short-circuits the rest. The ordering
//! is the core policy decision: a customer mid-flow (card capture, pending
//! form) beats a customer starting something new, and a known catalog item
//! beats general purchase intent, which beats operator-authored rules.
//!
//! Outbound sends and operator alerts are best-effort collaborators: their
//! failures are logged and never surfaced to the customer.

pub mod dispatcher;
pub mod outbound;
pub mod replies;
pub mod stages;

pub use dispatcher::{default_stages, ConversationDispatcher, Outcome, Stage, StageContext};
pub use outbound::{AlertError, AlertNotifier, AlertSummary, InboundMessage, MessageSender, SendError};
