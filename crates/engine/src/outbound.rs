use async_trait::async_trait;
use thiserror::Error;

/// One inbound chat event, reduced to what the engine needs. Non-text events
/// carry an empty `text` and fall through to whichever stage accepts that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub customer_id: String,
    pub text: String,
}

impl InboundMessage {
    pub fn text(customer_id: impl Into<String>, text: &str) -> Self {
        Self { customer_id: customer_id.into(), text: text.trim().to_string() }
    }

    pub fn non_text(customer_id: impl Into<String>) -> Self {
        Self { customer_id: customer_id.into(), text: String::new() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("outbound send failed: {0}")]
    Transport(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AlertError {
    #[error("operator alert failed: {0}")]
    Transport(String),
}

/// Outbound text channel back to the customer.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError>;
}

/// Structured summary pushed to a human operator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub kind: String,
    pub customer_id: String,
    pub name: Option<String>,
    pub product: Option<String>,
    pub code: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub note: Option<String>,
}

impl AlertSummary {
    pub fn new(kind: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self { kind: kind.into(), customer_id: customer_id.into(), ..Self::default() }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>, code: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self.code = Some(code.into());
        self
    }
}

/// Operator alert channel.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, summary: &AlertSummary) -> Result<(), AlertError>;
}
