use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use regalo_core::{
    BusinessHours, CatalogCache, Clock, FunctionRule, InventoryItem, SessionStore,
};

use crate::outbound::{AlertNotifier, AlertSummary, InboundMessage, MessageSender};
use crate::stages;

/// Result of offering a message to one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    NotHandled,
}

/// Everything a stage may read or touch while deciding on a message.
pub struct StageContext {
    pub sessions: Arc<SessionStore>,
    pub inventory: Arc<CatalogCache<InventoryItem>>,
    pub rules: Arc<CatalogCache<FunctionRule>>,
    pub sender: Arc<dyn MessageSender>,
    pub alerts: Arc<dyn AlertNotifier>,
    pub hours: BusinessHours,
    pub clock: Arc<dyn Clock>,
}

impl StageContext {
    /// Best-effort customer send: failures are logged, never retried and
    /// never propagated.
    pub async fn send(&self, to: &str, body: &str) {
        if let Err(error) = self.sender.send_text(to, body).await {
            warn!(
                event_name = "engine.outbound.send_failed",
                customer_id = to,
                error = %error,
                "outbound send failed; continuing"
            );
        }
    }

    /// Best-effort operator alert, same posture as [`StageContext::send`].
    pub async fn alert(&self, summary: AlertSummary) {
        if let Err(error) = self.alerts.notify(&summary).await {
            warn!(
                event_name = "engine.outbound.alert_failed",
                customer_id = %summary.customer_id,
                alert_kind = %summary.kind,
                error = %error,
                "operator alert failed; continuing"
            );
        }
    }
}

/// One step of the dispatch chain. Stages decide for themselves whether a
/// message applies to them; the dispatcher only supplies the ordering.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome;
}

/// The fixed stage order. Mid-flow continuations (card, form) outrank new
/// intents; catalog items outrank generic purchase phrases, which outrank
/// operator rules; the fallback always answers.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(stages::BusinessHoursGate),
        Box::new(stages::CardCapture),
        Box::new(stages::FormContinuation),
        Box::new(stages::MenuKeywords),
        Box::new(stages::FavoritesSelection),
        Box::new(stages::InventoryLookup),
        Box::new(stages::PurchaseIntent),
        Box::new(stages::DynamicRules),
        Box::new(stages::Fallback),
    ]
}

pub struct ConversationDispatcher {
    context: StageContext,
    stages: Vec<Box<dyn Stage>>,
}

impl ConversationDispatcher {
    pub fn new(context: StageContext) -> Self {
        Self::with_stages(context, default_stages())
    }

    pub fn with_stages(context: StageContext, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { context, stages }
    }

    /// Runs the chain; exactly one stage handles the message. Returns the
    /// name of the handling stage (or `"none"` with a custom chain that
    /// declines everything).
    pub async fn handle_message(&self, msg: &InboundMessage) -> &'static str {
        for stage in &self.stages {
            debug!(
                event_name = "engine.dispatch.offer",
                stage = stage.name(),
                customer_id = %msg.customer_id,
                "offering message to stage"
            );
            if stage.try_handle(&self.context, msg).await == Outcome::Handled {
                info!(
                    event_name = "engine.dispatch.handled",
                    stage = stage.name(),
                    customer_id = %msg.customer_id,
                    "message handled"
                );
                return stage.name();
            }
        }

        warn!(
            event_name = "engine.dispatch.unhandled",
            customer_id = %msg.customer_id,
            "no stage handled the message"
        );
        "none"
    }
}
