mod card;
mod fallback;
mod form;
mod hours;
mod intent;
mod inventory;
mod menu;
mod rules;

pub use card::CardCapture;
pub use fallback::Fallback;
pub use form::FormContinuation;
pub use hours::BusinessHoursGate;
pub use intent::PurchaseIntent;
pub use inventory::InventoryLookup;
pub use menu::{FavoritesSelection, MenuKeywords};
pub use rules::DynamicRules;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::America::Bogota;
    use tokio::sync::Mutex;

    use regalo_core::catalog::feed::{FeedError, FeedSource};
    use regalo_core::clock::FixedClock;
    use regalo_core::{BusinessHours, CatalogCache, SessionStore};

    use crate::dispatcher::StageContext;
    use crate::outbound::{
        AlertError, AlertNotifier, AlertSummary, InboundMessage, MessageSender, SendError,
    };

    pub struct FakeSender {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl FakeSender {
        pub fn new() -> Arc<Self> {
            Arc::new(Self { sent: Mutex::new(Vec::new()) })
        }

        pub async fn messages(&self) -> Vec<(String, String)> {
            self.sent.lock().await.clone()
        }

        pub async fn bodies(&self) -> Vec<String> {
            self.sent.lock().await.iter().map(|(_, body)| body.clone()).collect()
        }
    }

    #[async_trait]
    impl MessageSender for FakeSender {
        async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
            self.sent.lock().await.push((to.to_string(), body.to_string()));
            Ok(())
        }
    }

    pub struct FakeAlerts {
        pub raised: Mutex<Vec<AlertSummary>>,
    }

    impl FakeAlerts {
        pub fn new() -> Arc<Self> {
            Arc::new(Self { raised: Mutex::new(Vec::new()) })
        }

        pub async fn summaries(&self) -> Vec<AlertSummary> {
            self.raised.lock().await.clone()
        }
    }

    #[async_trait]
    impl AlertNotifier for FakeAlerts {
        async fn notify(&self, summary: &AlertSummary) -> Result<(), AlertError> {
            self.raised.lock().await.push(summary.clone());
            Ok(())
        }
    }

    pub struct StaticFeed {
        body: Result<String, FeedError>,
    }

    impl StaticFeed {
        pub fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self { body: Ok(body.to_string()) })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: Err(FeedError::Fetch {
                    url: "http://feed".to_string(),
                    message: "connection refused".to_string(),
                }),
            })
        }
    }

    #[async_trait]
    impl FeedSource for StaticFeed {
        async fn fetch_text(&self, _url: &str) -> Result<String, FeedError> {
            self.body.clone()
        }
    }

    /// 10:00 in Bogota, inside the default 9–18 window.
    pub fn open_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    /// 22:00 in Bogota, outside the window.
    pub fn closed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 11, 3, 0, 0).unwrap()
    }

    pub struct Harness {
        pub sender: Arc<FakeSender>,
        pub alerts: Arc<FakeAlerts>,
        pub sessions: Arc<SessionStore>,
        pub ctx: StageContext,
    }

    pub fn harness(inventory_csv: Option<&str>, rules_csv: Option<&str>) -> Harness {
        harness_at(inventory_csv, rules_csv, open_instant())
    }

    pub fn harness_at(
        inventory_csv: Option<&str>,
        rules_csv: Option<&str>,
        now: DateTime<Utc>,
    ) -> Harness {
        let sender = FakeSender::new();
        let alerts = FakeAlerts::new();
        let sessions = Arc::new(SessionStore::new());

        let inventory = Arc::new(match inventory_csv {
            Some(body) => CatalogCache::new(
                StaticFeed::ok(body),
                Some("http://feed/inventory".to_string()),
                std::time::Duration::from_secs(120),
            ),
            None => CatalogCache::new(
                StaticFeed::ok(""),
                None,
                std::time::Duration::from_secs(120),
            ),
        });
        let rules = Arc::new(match rules_csv {
            Some(body) => CatalogCache::new(
                StaticFeed::ok(body),
                Some("http://feed/rules".to_string()),
                std::time::Duration::from_secs(120),
            ),
            None => CatalogCache::new(
                StaticFeed::ok(""),
                None,
                std::time::Duration::from_secs(120),
            ),
        });

        let ctx = StageContext {
            sessions: sessions.clone(),
            inventory,
            rules,
            sender: sender.clone(),
            alerts: alerts.clone(),
            hours: BusinessHours::new(Bogota, 9, 18),
            clock: Arc::new(FixedClock(now)),
        };

        Harness { sender, alerts, sessions, ctx }
    }

    pub fn msg(customer_id: &str, text: &str) -> InboundMessage {
        InboundMessage::text(customer_id, text)
    }
}
