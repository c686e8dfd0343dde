use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use tracing::debug;

use regalo_core::{Clock, SystemClock};
use regalo_engine::{AlertError, AlertNotifier, AlertSummary, MessageSender};

/// Pushes operator alerts as WhatsApp messages to a configured recipient.
/// Without a recipient the notifier is a no-op, so the rest of the engine
/// never has to care whether alerting is wired up.
pub struct WhatsAppAlertNotifier {
    sender: Arc<dyn MessageSender>,
    recipient: Option<String>,
    timezone: Tz,
    clock: Arc<dyn Clock>,
}

impl WhatsAppAlertNotifier {
    pub fn new(sender: Arc<dyn MessageSender>, recipient: Option<String>, timezone: Tz) -> Self {
        Self { sender, recipient, timezone, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl AlertNotifier for WhatsAppAlertNotifier {
    async fn notify(&self, summary: &AlertSummary) -> Result<(), AlertError> {
        let Some(recipient) = self.recipient.as_deref() else {
            debug!(
                event_name = "whatsapp.alert.skipped",
                alert_kind = %summary.kind,
                "no alert recipient configured"
            );
            return Ok(());
        };

        let stamped_at = self.clock.now_utc().with_timezone(&self.timezone);
        let body = format_alert(summary, &stamped_at.format("%Y-%m-%d %H:%M").to_string());

        self.sender
            .send_text(recipient, &body)
            .await
            .map_err(|error| AlertError::Transport(error.to_string()))
    }
}

/// Renders the operator summary; absent fields show as `-` so the message
/// keeps a fixed shape that is easy to scan on a phone.
pub fn format_alert(summary: &AlertSummary, local_time: &str) -> String {
    let dash = |field: &Option<String>| field.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "🔔 {kind}\n\
         Cliente: {customer}\n\
         Nombre: {name}\n\
         Producto: {product} ({code})\n\
         Dirección: {address}\n\
         Ciudad: {city}\n\
         Nota: {note}\n\
         Hora: {time}",
        kind = summary.kind,
        customer = summary.customer_id,
        name = dash(&summary.name),
        product = dash(&summary.product),
        code = dash(&summary.code),
        address = dash(&summary.address),
        city = dash(&summary.city),
        note = dash(&summary.note),
        time = local_time,
    )
}
