use async_trait::async_trait;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::InboundMessage;
use crate::replies;

const GREETINGS: [&str; 5] = ["hola", "menu", "menú", "inicio", "start"];

/// Exact greeting keywords open the main menu.
pub struct MenuKeywords;

#[async_trait]
impl Stage for MenuKeywords {
    fn name(&self) -> &'static str {
        "menu_keywords"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        let lower = msg.text.to_lowercase();
        if !GREETINGS.contains(&lower.as_str()) {
            return Outcome::NotHandled;
        }

        ctx.send(&msg.customer_id, replies::MAIN_MENU).await;
        Outcome::Handled
    }
}

/// Menu option `1`: sends the favorites listing and arms card capture for
/// the next message.
pub struct FavoritesSelection;

#[async_trait]
impl Stage for FavoritesSelection {
    fn name(&self) -> &'static str {
        "favorites_selection"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        if msg.text != "1" {
            return Outcome::NotHandled;
        }

        ctx.send(&msg.customer_id, replies::FAVORITES).await;
        ctx.sessions.set_awaiting_card(&msg.customer_id, true);
        Outcome::Handled
    }
}
