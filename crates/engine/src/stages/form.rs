use async_trait::async_trait;

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::{AlertSummary, InboundMessage};
use crate::replies;

/// Continues a pending multi-step form: each text message answers the field
/// at the cursor. On the last answer the operator gets every collected pair
/// in original field order.
pub struct FormContinuation;

#[async_trait]
impl Stage for FormContinuation {
    fn name(&self) -> &'static str {
        "form_continuation"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        if msg.text.is_empty() {
            return Outcome::NotHandled;
        }
        let Some(mut form) = ctx.sessions.form(&msg.customer_id) else {
            return Outcome::NotHandled;
        };

        form.answer(&msg.text);

        if let Some(next_field) = form.current_field() {
            let prompt = replies::form_next_prompt(next_field);
            ctx.sessions.set_form(&msg.customer_id, form.clone());
            ctx.send(&msg.customer_id, &prompt).await;
            return Outcome::Handled;
        }

        ctx.send(&msg.customer_id, &form.completion_message).await;

        let collected = form
            .collected
            .iter()
            .map(|(field, answer)| format!("{field}: {answer}"))
            .collect::<Vec<_>>()
            .join("\n");
        ctx.alert(
            AlertSummary::new(format!("Formulario: {}", form.title), &msg.customer_id)
                .with_note(collected),
        )
        .await;

        ctx.sessions.clear_form(&msg.customer_id);
        Outcome::Handled
    }
}
