//! The Pirate Bay provider implementation (apibay JSON API)

use super::de::{lenient_u32, lenient_u64_opt};
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{classify, format_size_bytes, magnet_link, ListingRecord, ProviderName};
use anyhow::Result as AnyhowResult;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ApiBayEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    info_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64_opt")]
    size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    seeders: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    leechers: u32,
}

/// The Pirate Bay general listings
pub struct ThePirateBay {
    base_url: String,
}

impl ThePirateBay {
    pub fn new() -> Self {
        Self::with_base_url("https://apibay.org")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ThePirateBay {
    fn default() -> Self {
        Self::new()
    }
}

/// apibay answers an empty search with a single all-zero hash entry
fn is_placeholder_hash(hash: &str) -> bool {
    hash.chars().all(|c| c == '0')
}

impl Provider for ThePirateBay {
    fn name(&self) -> ProviderName {
        ProviderName::ThePirateBay
    }


    fn request(&self, query: &str) -> AnyhowResult<ProviderRequest> {
        Ok(ProviderRequest::get(format!("{}/q.php", self.base_url))
            .param("q", query)
            .param("cat", "0"))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<ListingRecord>> {
        let entries: Vec<ApiBayEntry> = response.json()?;

        let records = entries
            .into_iter()
            .filter_map(|entry| {
                let name = entry.name.filter(|n| !n.is_empty())?;
                let hash = entry
                    .info_hash
                    .filter(|h| !h.is_empty() && !is_placeholder_hash(h))?;

                let mut record =
                    ListingRecord::new(name.clone(), magnet_link(&hash, &name), self.name())
                        .with_quality(classify(&name))
                        .with_peers(entry.seeders, entry.leechers);

                if let Some(bytes) = entry.size.filter(|b| *b > 0) {
                    record = record.with_size(format_size_bytes(bytes));
                }
                Some(record)
            })
            .collect();

        Ok(records)
    }

    fn init(&mut self, config: &ProviderConfig) -> AnyhowResult<()> {
        if let Some(ref url) = config.base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(())
    }
}
