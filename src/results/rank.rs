//! Listing ranking

use super::types::ListingRecord;

/// Order listings by quality tier, then by seeders, both descending.
///
/// The sort is stable: listings that tie on both keys keep their input order.
pub fn rank(mut records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    records.sort_by(|a, b| {
        b.quality_tier
            .weight()
            .cmp(&a.quality_tier.weight())
            .then_with(|| b.seeder_count.cmp(&a.seeder_count))
    });
    records
}
