//! WhatsApp Cloud API integration.
//!
//! - **Client** (`client`) - outbound text messages through the Graph API
//! - **Alerts** (`alerts`) - operator notifications as WhatsApp messages
//! - **Webhook** (`webhook`) - inbound payload types and message extraction

pub mod alerts;
pub mod client;
pub mod webhook;

pub use alerts::WhatsAppAlertNotifier;
pub use client::{WhatsAppClient, WhatsAppError};
pub use webhook::{extract_inbound, WebhookPayload};
