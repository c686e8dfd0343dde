use async_trait::async_trait;
use tracing::warn;

use regalo_core::{find_rule, FormState, RuleKind};

use crate::dispatcher::{Outcome, Stage, StageContext};
use crate::outbound::{AlertSummary, InboundMessage};
use crate::replies;

/// Executes the first enabled operator rule whose trigger matches. A FORM
/// rule with an empty field list makes the whole stage decline, mirroring the
/// first-match contract: later rows are not consulted.
pub struct DynamicRules;

#[async_trait]
impl Stage for DynamicRules {
    fn name(&self) -> &'static str {
        "dynamic_rules"
    }

    async fn try_handle(&self, ctx: &StageContext, msg: &InboundMessage) -> Outcome {
        if msg.text.is_empty() {
            return Outcome::NotHandled;
        }

        let rows = match ctx.rules.rows().await {
            Ok(rows) => rows,
            Err(error) => {
                warn!(
                    event_name = "engine.rules.feed_failed",
                    customer_id = %msg.customer_id,
                    error = %error,
                    "rule feed unavailable; falling through"
                );
                return Outcome::NotHandled;
            }
        };

        let Some(rule) = find_rule(&rows, &msg.text) else {
            return Outcome::NotHandled;
        };

        match rule.kind {
            RuleKind::Text => {
                ctx.send(&msg.customer_id, &rule.payload1).await;
                if !rule.payload2.is_empty() {
                    ctx.alert(
                        AlertSummary::new("Función TEXT", &msg.customer_id)
                            .with_note(&rule.payload2),
                    )
                    .await;
                }
                Outcome::Handled
            }
            RuleKind::Alert => {
                let kind =
                    if rule.payload1.is_empty() { "Alerta" } else { rule.payload1.as_str() };
                ctx.alert(
                    AlertSummary::new(kind, &msg.customer_id).with_note(&rule.payload2),
                )
                .await;
                ctx.send(&msg.customer_id, replies::ALERT_SENT).await;
                Outcome::Handled
            }
            RuleKind::Form => {
                let fields: Vec<String> = rule
                    .payload1
                    .split('|')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect();
                if fields.is_empty() {
                    return Outcome::NotHandled;
                }

                let completion = if rule.payload2.is_empty() {
                    replies::DEFAULT_FORM_THANKS.to_string()
                } else {
                    rule.payload2.clone()
                };
                let form = FormState::new(rule.trigger.clone(), fields, completion);

                ctx.send(&msg.customer_id, &replies::form_intro(&form.fields)).await;
                let first = form.current_field().unwrap_or_default().to_string();
                ctx.sessions.set_form(&msg.customer_id, form);
                ctx.send(&msg.customer_id, &replies::form_first_prompt(&first)).await;
                Outcome::Handled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicRules;
    use crate::dispatcher::{Outcome, Stage};
    use crate::replies;
    use crate::stages::testing::{harness, msg};

    #[tokio::test]
    async fn text_rule_sends_payload_and_optional_alert() {
        let rules = "enabled,type,trigger,payload1,payload2\n\
             yes,TEXT,promo,Hay 2x1 en peluches hoy 🎉,Cliente preguntó por promos\n";
        let h = harness(None, Some(rules));

        let outcome = DynamicRules.try_handle(&h.ctx, &msg("c1", "tienen alguna PROMO?")).await;

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(h.sender.bodies().await, vec!["Hay 2x1 en peluches hoy 🎉".to_string()]);
        let alerts = h.alerts.summaries().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "Función TEXT");
        assert_eq!(alerts[0].note.as_deref(), Some("Cliente preguntó por promos"));
    }

    #[tokio::test]
    async fn text_rule_without_second_payload_skips_the_alert() {
        let rules = "enabled,type,trigger,payload1,payload2\nyes,TEXT,promo,Hay 2x1 hoy,\n";
        let h = harness(None, Some(rules));

        DynamicRules.try_handle(&h.ctx, &msg("c1", "promo")).await;

        assert!(h.alerts.summaries().await.is_empty());
    }

    #[tokio::test]
    async fn alert_rule_notifies_operator_and_confirms() {
        let rules = "enabled,type,trigger,payload1,payload2\n\
             yes,ALERT,reclamo,Reclamo urgente,Cliente con reclamo\n";
        let h = harness(None, Some(rules));

        let outcome = DynamicRules.try_handle(&h.ctx, &msg("c1", "tengo un reclamo")).await;

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(h.sender.bodies().await, vec![replies::ALERT_SENT.to_string()]);
        let alerts = h.alerts.summaries().await;
        assert_eq!(alerts[0].kind, "Reclamo urgente");
        assert_eq!(alerts[0].note.as_deref(), Some("Cliente con reclamo"));
    }

    #[tokio::test]
    async fn alert_rule_defaults_its_title() {
        let rules = "enabled,type,trigger,payload1,payload2\nyes,ALERT,queja,,Detalle\n";
        let h = harness(None, Some(rules));

        DynamicRules.try_handle(&h.ctx, &msg("c1", "queja")).await;

        assert_eq!(h.alerts.summaries().await[0].kind, "Alerta");
    }

    #[tokio::test]
    async fn form_rule_creates_state_and_prompts_twice() {
        let rules = "enabled,type,trigger,payload1,payload2\n\
             yes,FORM,reclamo,Nombre | Pedido | Ciudad,Recibido. Te contactamos.\n";
        let h = harness(None, Some(rules));

        let outcome = DynamicRules.try_handle(&h.ctx, &msg("c1", "quiero poner un reclamo")).await;

        assert_eq!(outcome, Outcome::Handled);
        let form = h.sessions.form("c1").expect("form created");
        assert_eq!(form.title, "reclamo");
        assert_eq!(form.fields, vec!["Nombre", "Pedido", "Ciudad"]);
        assert_eq!(form.completion_message, "Recibido. Te contactamos.");

        let bodies = h.sender.bodies().await;
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], "Por favor responde:\n• Nombre\n• Pedido\n• Ciudad");
        assert_eq!(bodies[1], "👉 Empecemos con: *Nombre*");
    }

    #[tokio::test]
    async fn form_rule_with_empty_fields_falls_through() {
        let rules = "enabled,type,trigger,payload1,payload2\nyes,FORM,reclamo, | | ,\n";
        let h = harness(None, Some(rules));

        let outcome = DynamicRules.try_handle(&h.ctx, &msg("c1", "reclamo")).await;

        assert_eq!(outcome, Outcome::NotHandled);
        assert!(h.sessions.form("c1").is_none());
        assert!(h.sender.bodies().await.is_empty());
    }

    #[tokio::test]
    async fn form_rule_defaults_completion_message() {
        let rules = "enabled,type,trigger,payload1,payload2\nyes,FORM,reclamo,Nombre,\n";
        let h = harness(None, Some(rules));

        DynamicRules.try_handle(&h.ctx, &msg("c1", "reclamo")).await;

        assert_eq!(
            h.sessions.form("c1").expect("form").completion_message,
            replies::DEFAULT_FORM_THANKS
        );
    }

    #[tokio::test]
    async fn earlier_matching_rule_shadows_later_ones() {
        let rules = "enabled,type,trigger,payload1,payload2\n\
             yes,TEXT,promo,primera respuesta,\n\
             yes,ALERT,promo,segunda,\n";
        let h = harness(None, Some(rules));

        DynamicRules.try_handle(&h.ctx, &msg("c1", "promo")).await;

        assert_eq!(h.sender.bodies().await, vec!["primera respuesta".to_string()]);
        assert!(h.alerts.summaries().await.is_empty());
    }

    #[tokio::test]
    async fn feed_failure_degrades_to_not_handled() {
        let h = harness(None, None);
        let cache = regalo_core::CatalogCache::new(
            crate::stages::testing::StaticFeed::failing(),
            Some("http://feed/rules".to_string()),
            std::time::Duration::from_secs(120),
        );
        let ctx = crate::dispatcher::StageContext { rules: std::sync::Arc::new(cache), ..h.ctx };

        let outcome = DynamicRules.try_handle(&ctx, &msg("c1", "promo")).await;
        assert_eq!(outcome, Outcome::NotHandled);
    }
}
