use async_trait::async_trait;
use tracing::warn;

use regalo_core::find_item;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::{AlertSummary, InboundMessage};
use crate::replies;

/// Looks the message text up against the cached inventory. A feed failure is
/// downgraded to "no match" so the chain keeps going.
pub struct InventoryLookup;

#[async_trait]
impl Stage for InventoryLookup {
    fn name(&self) -> &'static str {
        "inventory_lookup"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        if msg.text.is_empty() {
            return Outcome::NotHandled;
        }

        let rows = match ctx.inventory.rows().await {
            Ok(rows) => rows,
            Err(error) => {
                warn!(
                    event_name = "engine.inventory.feed_failed",
                    customer_id = %msg.customer_id,
                    error = %error,
                    "inventory feed unavailable; falling through"
                );
                return Outcome::NotHandled;
            }
        };

        let Some(item) = find_item(&rows, &msg.text) else {
            return Outcome::NotHandled;
        };

        if !item.in_stock() {
            ctx.send(&msg.customer_id, &replies::out_of_stock(&item.name)).await;
            ctx.alert(
                AlertSummary::new("Sin stock", &msg.customer_id)
                    .with_product(&item.name, &item.code)
                    .with_note("Inventario sin stock"),
            )
            .await;
            return Outcome::Handled;
        }

        ctx.send(&msg.customer_id, &replies::available(&item.name)).await;
        if item.price > 0 {
            ctx.send(&msg.customer_id, &replies::price_quote(item.price)).await;
        }
        ctx.send(&msg.customer_id, replies::DELIVERY_PROMPT).await;
        Outcome::Handled
    }
}
