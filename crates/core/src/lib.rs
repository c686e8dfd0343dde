pub mod catalog;
pub mod clock;
pub mod config;
pub mod hours;
pub mod session;

pub use catalog::cache::{CatalogCache, CatalogError};
pub use catalog::feed::{FeedError, FeedRecord, FeedSource, FromFeedRow};
pub use catalog::inventory::{find_item, InventoryItem};
pub use catalog::rules::{find_rule, FunctionRule, RuleKind};
pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use hours::BusinessHours;
pub use session::{FormState, Session, SessionStore};
