//! Webhook endpoints for the WhatsApp Cloud API.
//!
//! The POST handler always answers 200 once the payload parses: the Cloud API
//! retries non-2xx deliveries, and a conversation failure is never something a
//! redelivery would fix.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};

use regalo_engine::ConversationDispatcher;
use regalo_whatsapp::{extract_inbound, WebhookPayload};

#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Arc<ConversationDispatcher>,
    pub verify_token: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route("/webhook", get(verify_webhook).post(receive_webhook)).with_state(state)
}

/// Meta's subscription handshake: echo the challenge when the verify token
/// matches, 403 otherwise.
async fn verify_webhook(
    State(state): State<WebhookState>,
    Query(params): Query<VerifyParams>,
) -> (StatusCode, String) {
    let subscribed = params.mode.as_deref() == Some("subscribe");
    let token_matches =
        params.verify_token.as_deref() == Some(state.verify_token.expose_secret());

    if subscribed && token_matches {
        info!(event_name = "ingress.webhook.verified", "webhook subscription verified");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        warn!(
            event_name = "ingress.webhook.verify_rejected",
            subscribed, "webhook verification rejected"
        );
        (StatusCode::FORBIDDEN, String::new())
    }
}

async fn receive_webhook(
    State(state): State<WebhookState>,
    Json(payload): Json<WebhookPayload>,
) -> StatusCode {
    match extract_inbound(&payload) {
        Some(message) => {
            let stage = state.dispatcher.handle_message(&message).await;
            info!(
                event_name = "ingress.webhook.dispatched",
                customer_id = %message.customer_id,
                stage,
                "inbound message dispatched"
            );
        }
        None => {
            debug!(event_name = "ingress.webhook.ignored", "payload carried no message");
        }
    }

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Bogota;
    use secrecy::SecretString;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use regalo_core::catalog::feed::{FeedError, FeedSource};
    use regalo_core::clock::FixedClock;
    use regalo_core::{BusinessHours, CatalogCache, SessionStore};
    use regalo_engine::{
        AlertError, AlertNotifier, AlertSummary, ConversationDispatcher, InboundMessage,
        MessageSender, Outcome, SendError, Stage, StageContext,
    };

    use super::{router, WebhookState};

    struct NullSender;

    #[async_trait]
    impl MessageSender for NullSender {
        async fn send_text(&self, _to: &str, _body: &str) -> Result<(), SendError> {
            Ok(())
        }
    }

    struct NullAlerts;

    #[async_trait]
    impl AlertNotifier for NullAlerts {
        async fn notify(&self, _summary: &AlertSummary) -> Result<(), AlertError> {
            Ok(())
        }
    }

    struct EmptyFeed;

    #[async_trait]
    impl FeedSource for EmptyFeed {
        async fn fetch_text(&self, _url: &str) -> Result<String, FeedError> {
            Ok(String::new())
        }
    }

    struct RecordingStage {
        seen: Arc<Mutex<Vec<InboundMessage>>>,
    }

    #[async_trait]
    impl Stage for RecordingStage {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn try_handle(&self, _ctx: &StageContext, msg: &InboundMessage) -> Outcome {
            self.seen.lock().await.push(msg.clone());
            Outcome::Handled
        }
    }

    fn test_state() -> (WebhookState, Arc<Mutex<Vec<InboundMessage>>>) {
        let context = StageContext {
            sessions: Arc::new(SessionStore::new()),
            inventory: Arc::new(CatalogCache::new(
                Arc::new(EmptyFeed),
                None,
                std::time::Duration::from_secs(120),
            )),
            rules: Arc::new(CatalogCache::new(
                Arc::new(EmptyFeed),
                None,
                std::time::Duration::from_secs(120),
            )),
            sender: Arc::new(NullSender),
            alerts: Arc::new(NullAlerts),
            hours: BusinessHours::new(Bogota, 9, 18),
            clock: Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap())),
        };

        let seen = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = ConversationDispatcher::with_stages(
            context,
            vec![Box::new(RecordingStage { seen: seen.clone() })],
        );

        let state = WebhookState {
            dispatcher: Arc::new(dispatcher),
            verify_token: SecretString::from("verify-secret"),
        };
        (state, seen)
    }

    #[tokio::test]
    async fn handshake_echoes_the_challenge_for_the_right_token() {
        let (state, _) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=verify-secret&hub.challenge=12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"12345");
    }

    #[tokio::test]
    async fn handshake_rejects_a_wrong_token() {
        let (state, _) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn handshake_rejects_a_missing_mode() {
        let (state, _) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.verify_token=verify-secret&hub.challenge=12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn inbound_text_reaches_the_dispatcher() {
        let (state, seen) = test_state();
        let app = router(state);

        let payload = serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "573001112233",
                            "type": "text",
                            "text": { "body": "hola" }
                        }]
                    }
                }]
            }]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let messages = seen.lock().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].customer_id, "573001112233");
        assert_eq!(messages[0].text, "hola");
    }

    #[tokio::test]
    async fn status_only_payload_is_acknowledged_without_dispatch() {
        let (state, seen) = test_state();
        let app = router(state);

        let payload = serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{ "changes": [{ "value": {} }] }]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(seen.lock().await.is_empty());
    }
}
