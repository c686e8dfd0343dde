use super::feed::{FeedRecord, FromFeedRow};

/// Action class of an operator-authored rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    Text,
    Alert,
    Form,
}

impl RuleKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "TEXT" => Some(Self::Text),
            "ALERT" => Some(Self::Alert),
            "FORM" => Some(Self::Form),
            _ => None,
        }
    }
}

/// One row of the dynamic rule feed.
///
/// The trigger carries its own matching mode: a leading `=` demands exact
/// (case-insensitive) equality with the whole input, anything else is a
/// substring keyword. Operators author both strict commands (`=reset`) and
/// loose triggers (`promo`) in the same table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionRule {
    pub enabled: bool,
    pub kind: RuleKind,
    pub trigger: String,
    pub payload1: String,
    pub payload2: String,
}

impl FunctionRule {
    /// `lower_text` must already be lowercased and trimmed.
    pub fn matches(&self, lower_text: &str) -> bool {
        match self.trigger.strip_prefix('=') {
            Some(exact) => lower_text == exact.to_lowercase(),
            None => lower_text.contains(&self.trigger.to_lowercase()),
        }
    }
}

impl FromFeedRow for FunctionRule {
    fn from_feed_row(record: &FeedRecord) -> Option<Self> {
        let kind = RuleKind::parse(record.text("type"))?;
        let trigger = record.text("trigger").to_string();
        if trigger.is_empty() {
            return None;
        }
        Some(Self {
            enabled: record.text("enabled").to_ascii_lowercase().starts_with('y'),
            kind,
            trigger,
            payload1: record.text("payload1").to_string(),
            payload2: record.text("payload2").to_string(),
        })
    }
}

/// First enabled rule in catalog order whose trigger matches the input.
pub fn find_rule<'a>(rows: &'a [FunctionRule], text: &str) -> Option<&'a FunctionRule> {
    let lower = text.to_lowercase();
    rows.iter().filter(|rule| rule.enabled).find(|rule| rule.matches(&lower))
}
