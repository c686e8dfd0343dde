use async_trait::async_trait;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::InboundMessage;
use crate::replies;

/// Last stage in the chain; always answers so every inbound event gets some
/// customer-visible response.
pub struct Fallback;

#[async_trait]
impl Stage for Fallback {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        ctx.send(&msg.customer_id, replies::FALLBACK_HELP).await;
        Outcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::Fallback;
    use crate::dispatcher::{Outcome, Stage};
    use crate::replies;
    use crate::stages::testing::{harness, msg};

    #[tokio::test]
    async fn always_sends_the_help_message() {
        let h = harness(None, None);
        for text in ["algo raro", ""] {
            assert_eq!(Fallback.try_handle(&h.ctx, &msg("c1", text)).await, Outcome::Handled);
        }
        assert_eq!(h.sender.bodies().await, vec![replies::FALLBACK_HELP.to_string(); 2]);
    }
}
