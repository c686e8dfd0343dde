//! Inbound webhook payload types.
//!
//! The Cloud API delivers batches of entries and changes; only the first
//! message of the first change is acted on, matching the at-most-one-reply
//! contract of the conversation engine. Everything else in the payload
//! (statuses, contacts, later entries) is ignored.

use serde::Deserialize;

use regalo_engine::InboundMessage;

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub value: ChangeValue,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<MessageText>,
}

#[derive(Debug, Deserialize)]
pub struct MessageText {
    #[serde(default)]
    pub body: String,
}

/// Reduces a webhook payload to the first inbound message, if any. Non-text
/// messages (images, audio, stickers) keep their sender but carry empty text.
pub fn extract_inbound(payload: &WebhookPayload) -> Option<InboundMessage> {
    if payload.object.is_none() {
        return None;
    }

    let message = payload.entry.first()?.changes.first()?.value.messages.first()?;

    if message.kind == "text" {
        let body = message.text.as_ref().map(|text| text.body.as_str()).unwrap_or_default();
        Some(InboundMessage::text(&message.from, body))
    } else {
        Some(InboundMessage::non_text(&message.from))
    }
}
