use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use regalo_core::config::{AppConfig, ConfigError, LoadOptions};
use regalo_core::{CatalogCache, SessionStore, SystemClock};
use regalo_engine::{ConversationDispatcher, StageContext};
use regalo_whatsapp::{WhatsAppAlertNotifier, WhatsAppClient};

use crate::feeds::HttpFeedSource;
use crate::routes::WebhookState;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<ConversationDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let hours = config.hours.business_hours()?;

    let feed_source = Arc::new(HttpFeedSource::new());
    let inventory = Arc::new(CatalogCache::new(
        feed_source.clone(),
        config.feeds.inventory_url.clone(),
        config.feeds.inventory_ttl(),
    ));
    let rules = Arc::new(CatalogCache::new(
        feed_source,
        config.feeds.rules_url.clone(),
        config.feeds.rules_ttl(),
    ));

    let client = Arc::new(WhatsAppClient::new(
        config.whatsapp.phone_number_id.clone(),
        config.whatsapp.access_token.clone(),
    ));
    let alerts = Arc::new(WhatsAppAlertNotifier::new(
        client.clone(),
        config.whatsapp.alert_recipient.clone(),
        hours.timezone(),
    ));

    let context = StageContext {
        sessions: Arc::new(SessionStore::new()),
        inventory,
        rules,
        sender: client,
        alerts,
        hours,
        clock: Arc::new(SystemClock),
    };

    info!(
        event_name = "system.bootstrap.ready",
        timezone = %hours.timezone(),
        "conversation engine wired"
    );

    Ok(Application {
        dispatcher: Arc::new(ConversationDispatcher::new(context)),
        config,
    })
}

impl Application {
    pub fn webhook_state(&self) -> WebhookState {
        WebhookState {
            dispatcher: self.dispatcher.clone(),
            verify_token: self.config.whatsapp.verify_token.clone(),
        }
    }
}
