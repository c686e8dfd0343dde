use async_trait::async_trait;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::{AlertSummary, InboundMessage};
use crate::replies;

pub const MAX_CARD_CHARS: usize = 500;

/// Captures the free-text gift-card message armed by the favorites menu.
/// Runs before the form stage: a customer with both flows pending is treated
/// as answering the card prompt.
pub struct CardCapture;

#[async_trait]
impl Stage for CardCapture {
    fn name(&self) -> &'static str {
        "card_capture"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        if msg.text.is_empty() || !ctx.sessions.awaiting_card(&msg.customer_id) {
            return Outcome::NotHandled;
        }

        let card_text: String = msg.text.chars().take(MAX_CARD_CHARS).collect();

        ctx.send(&msg.customer_id, &replies::card_confirmation(&card_text)).await;
        ctx.alert(
            AlertSummary::new("Tarjeta personalizada", &msg.customer_id).with_note(&card_text),
        )
        .await;

        ctx.sessions.set_awaiting_card(&msg.customer_id, false);
        ctx.send(&msg.customer_id, replies::DELIVERY_PROMPT).await;
        Outcome::Handled
    }
}
