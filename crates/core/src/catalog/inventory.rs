use super::feed::{FeedRecord, FromFeedRow};

/// One sellable item from the inventory feed. Immutable once loaded into a
/// cache snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryItem {
    pub code: String,
    pub name: String,
    pub stock: u32,
    pub price: u64,
}

impl InventoryItem {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl FromFeedRow for InventoryItem {
    fn from_feed_row(record: &FeedRecord) -> Option<Self> {
        let code = record.text("code").to_string();
        let name = record.text("name").to_string();
        if code.is_empty() && name.is_empty() {
            return None;
        }
        Some(Self { code, name, stock: record.integer("stock"), price: record.amount("price") })
    }
}

/// Finds the first item whose code or name appears inside the input text.
///
/// Matching is case-insensitive and deliberately directional: the customer
/// phrase contains the catalog token, not the reverse, so a short code like
/// `OSO1` matches inside "quiero el OSO1 por favor". First match in catalog
/// order wins; there is no scoring.
pub fn find_item<'a>(rows: &'a [InventoryItem], text: &str) -> Option<&'a InventoryItem> {
    let needle_haystack = text.to_lowercase();
    rows.iter().find(|item| {
        (!item.code.is_empty() && needle_haystack.contains(&item.code.to_lowercase()))
            || (!item.name.is_empty() && needle_haystack.contains(&item.name.to_lowercase()))
    })
}
