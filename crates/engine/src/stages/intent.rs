use async_trait::async_trait;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::{AlertSummary, InboundMessage};
use crate::replies;

const CLOSING_PHRASES: [&str; 8] = [
    "lo compro",
    "comprar",
    "confirmo",
    "resérvame",
    "enviar",
    "pago contraentrega",
    "lo quiero",
    "se entrega a las",
];

/// Detects generic closing language when no catalog item matched, flags the
/// operator and asks for delivery details.
pub struct PurchaseIntent;

#[async_trait]
impl Stage for PurchaseIntent {
    fn name(&self) -> &'static str {
        "purchase_intent"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        let lower = msg.text.to_lowercase();
        if !CLOSING_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return Outcome::NotHandled;
        }

        ctx.alert(
            AlertSummary::new("Intento de cierre", &msg.customer_id)
                .with_note("Cliente quiere comprar"),
        )
        .await;
        ctx.send(&msg.customer_id, replies::CLOSING_PROMPT).await;
        Outcome::Handled
    }
}
