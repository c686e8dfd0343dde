use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

use super::feed::{parse_rows, FeedError, FeedSource, FromFeedRow};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Feed(#[from] FeedError),
}

#[derive(Clone, Debug)]
struct Snapshot<T> {
    fetched_at: Option<Instant>,
    rows: Vec<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self { fetched_at: None, rows: Vec::new() }
    }
}

/// TTL-backed cache over one tabular feed.
///
/// Caching is advisory: a fresh non-empty snapshot is served without any
/// remote call; anything else triggers a fetch whose result replaces the
/// snapshot. Concurrent misses are not de-duplicated — each fetch
/// independently replaces the snapshot and the last write wins, which is
/// harmless because rows are immutable per fetch. A `ttl` of zero disables
/// caching entirely. An unset URL fails open to an empty catalog.
pub struct CatalogCache<T> {
    source: Arc<dyn FeedSource>,
    url: Option<String>,
    ttl: Duration,
    snapshot: Mutex<Snapshot<T>>,
}

impl<T> CatalogCache<T>
where
    T: FromFeedRow + Clone,
{
    pub fn new(source: Arc<dyn FeedSource>, url: Option<String>, ttl: Duration) -> Self {
        Self { source, url, ttl, snapshot: Mutex::new(Snapshot::default()) }
    }

    pub async fn rows(&self) -> Result<Vec<T>, CatalogError> {
        let Some(url) = self.url.as_deref() else {
            return Ok(Vec::new());
        };

        if let Some(rows) = self.fresh_rows() {
            return Ok(rows);
        }

        let body = self.source.fetch_text(url).await?;
        let rows = parse_rows::<T>(&body);

        let mut snapshot = self.snapshot.lock().expect("catalog snapshot lock poisoned");
        *snapshot = Snapshot { fetched_at: Some(Instant::now()), rows: rows.clone() };
        Ok(rows)
    }

    // The guard is confined here so it is never held across the fetch await.
    fn fresh_rows(&self) -> Option<Vec<T>> {
        if self.ttl.is_zero() {
            return None;
        }
        let snapshot = self.snapshot.lock().expect("catalog snapshot lock poisoned");
        let fetched_at = snapshot.fetched_at?;
        if fetched_at.elapsed() < self.ttl && !snapshot.rows.is_empty() {
            Some(snapshot.rows.clone())
        } else {
            None
        }
    }
}
