//! Content-identifier based deduplication

use super::types::ListingRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static CONTENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"btih:([a-fA-F0-9]{40})").expect("content id pattern compiles"));

/// Extract the lowercased 40-hex content identifier from a locator
pub fn content_id(content_link: &str) -> Option<String> {
    CONTENT_ID_RE
        .captures(content_link)
        .map(|caps| caps[1].to_lowercase())
}

/// Collapse listings sharing a content identifier.
///
/// The first occurrence wins and keeps its position. Listings without an
/// extractable identifier are dropped.
pub fn dedup(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen = HashSet::new();

    records
        .into_iter()
        .filter(|record| match content_id(&record.content_link) {
            Some(id) => seen.insert(id),
            None => false,
        })
        .collect()
}
