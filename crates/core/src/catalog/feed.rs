use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("feed fetch failed for `{url}`: {message}")]
    Fetch { url: String, message: String },
}

/// Remote source of delimited tabular text. The production implementation is
/// an HTTP client; tests script canned responses.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FeedError>;
}

/// One data row of a feed, resolved against the header.
///
/// Column names are case-insensitive. Missing columns read as empty strings;
/// numeric accessors parse permissively and default to zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedRecord {
    columns: HashMap<String, String>,
}

impl FeedRecord {
    pub fn text(&self, column: &str) -> &str {
        self.columns.get(&column.to_ascii_lowercase()).map(String::as_str).unwrap_or("")
    }

    pub fn integer(&self, column: &str) -> u32 {
        // Accept decimals in the wild ("3.0") and truncate.
        self.text(column).parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32).unwrap_or(0)
    }

    pub fn amount(&self, column: &str) -> u64 {
        self.text(column).parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64).unwrap_or(0)
    }
}

/// Row type constructible from a feed record. Returning `None` discards the
/// row (no identifying key, unknown kind, and so on).
pub trait FromFeedRow: Sized {
    fn from_feed_row(record: &FeedRecord) -> Option<Self>;
}

/// Parses delimited text into records keyed by the lowercased header row.
/// Blank lines are skipped; short rows read as empty in the missing columns.
pub fn parse_table(raw: &str) -> Vec<FeedRecord> {
    let mut lines = raw.lines().map(str::trim_end).filter(|line| !line.is_empty());

    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let names: Vec<String> =
        header.split(',').map(|name| name.trim().to_ascii_lowercase()).collect();

    lines
        .map(|line| {
            let mut columns = HashMap::with_capacity(names.len());
            let mut values = line.split(',');
            for name in &names {
                let value = values.next().unwrap_or("").trim();
                columns.insert(name.clone(), value.to_string());
            }
            FeedRecord { columns }
        })
        .collect()
}

/// Parses a feed body into typed rows, dropping rows the type rejects.
pub fn parse_rows<T: FromFeedRow>(raw: &str) -> Vec<T> {
    parse_table(raw).iter().filter_map(T::from_feed_row).collect()
}
