//! Catalog data sourced from external tabular feeds.
//!
//! Two independent catalogs share the machinery here: the product inventory
//! and the operator-authored function rules. Each is a delimited-text table
//! behind a [`cache::CatalogCache`] with its own URL and TTL; the matchers in
//! [`inventory`] and [`rules`] work on read-only row slices.

pub mod cache;
pub mod feed;
pub mod inventory;
pub mod rules;
