use async_trait::async_trait;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::InboundMessage;
use crate::replies;

/// Terminal gate: outside the configured window every message, whatever its
/// content or session state, gets only the hours notice.
pub struct BusinessHoursGate;

#[async_trait]
impl Stage for BusinessHoursGate {
    fn name(&self) -> &'static str {
        "business_hours"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        if ctx.hours.is_open_at(ctx.clock.now_utc()) {
            return Outcome::NotHandled;
        }

        ctx.send(&msg.customer_id, replies::OUTSIDE_HOURS).await;
        Outcome::Handled
    }
}
