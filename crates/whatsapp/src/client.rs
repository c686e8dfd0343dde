use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use regalo_engine::{MessageSender, SendError};

const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com/v22.0";

#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("whatsapp request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("whatsapp api rejected the message: status {status}, body {body}")]
    Api { status: u16, body: String },
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct OutboundText<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

/// Thin client over the Cloud API `/{phone_number_id}/messages` endpoint.
pub struct WhatsAppClient {
    http: Client,
    base_url: String,
    phone_number_id: String,
    access_token: SecretString,
}

impl WhatsAppClient {
    pub fn new(phone_number_id: impl Into<String>, access_token: SecretString) -> Self {
        Self::with_base_url(DEFAULT_GRAPH_BASE_URL, phone_number_id, access_token)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        phone_number_id: impl Into<String>,
        access_token: SecretString,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            phone_number_id: phone_number_id.into(),
            access_token,
        }
    }

    pub async fn send_message(&self, to: &str, body: &str) -> Result<(), WhatsAppError> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);
        let payload = OutboundText {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::Api { status: status.as_u16(), body });
        }

        debug!(event_name = "whatsapp.message.sent", to, "outbound message accepted");
        Ok(())
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
        self.send_message(to, body).await.map_err(|error| SendError::Transport(error.to_string()))
    }
}
