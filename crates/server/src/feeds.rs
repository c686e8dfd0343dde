use async_trait::async_trait;
use reqwest::Client;

use regalo_core::catalog::feed::{FeedError, FeedSource};

/// Fetches catalog feeds over HTTP. Non-success statuses count as fetch
/// failures so the caches never parse an error page as a catalog.
pub struct HttpFeedSource {
    http: Client,
}

impl HttpFeedSource {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_text(&self, url: &str) -> Result<String, FeedError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| FeedError::Fetch { url: url.to_string(), message: error.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Fetch {
                url: url.to_string(),
                message: format!("unexpected status {status}"),
            });
        }

        response
            .text()
            .await
            .map_err(|error| FeedError::Fetch { url: url.to_string(), message: error.to_string() })
    }
}
