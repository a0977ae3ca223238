//! EZTV television provider implementation

use super::de::{lenient_u32, lenient_u64_opt};
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{format_size_bytes, ListingRecord, ProviderName, QualityTier};
use anyhow::Result as AnyhowResult;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TorrentsResponse {
    #[serde(default)]
    torrents: Option<Vec<EztvTorrent>>,
}

#[derive(Debug, Deserialize)]
struct EztvTorrent {
    #[serde(default)]
    title: String,
    #[serde(default)]
    magnet_url: String,
    #[serde(default, deserialize_with = "lenient_u64_opt")]
    size_bytes: Option<u64>,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    seeds: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    peers: u32,
}

/// EZTV TV episode listings (JSON API)
pub struct Eztv {
    base_url: String,
}

impl Eztv {
    pub fn new() -> Self {
        Self::with_base_url("https://eztv.re")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for Eztv {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Eztv {
    fn name(&self) -> ProviderName {
        ProviderName::Eztv
    }


    fn request(&self, query: &str) -> AnyhowResult<ProviderRequest> {
        Ok(
            ProviderRequest::get(format!("{}/api/get-torrents", self.base_url))
                .param("limit", "20")
                .param("imdb_id", "")
                .param("query_term", query),
        )
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<ListingRecord>> {
        let parsed: TorrentsResponse = response.json()?;

        let records = parsed
            .torrents
            .unwrap_or_default()
            .into_iter()
            .map(|t| {
                let quality = t
                    .quality
                    .as_deref()
                    .map(QualityTier::from_label)
                    .unwrap_or_default();

                let mut record = ListingRecord::new(t.title, t.magnet_url, ProviderName::Eztv)
                    .with_quality(quality)
                    .with_peers(t.seeds, t.peers);

                if let Some(bytes) = t.size_bytes.filter(|b| *b > 0) {
                    record = record.with_size(format_size_bytes(bytes));
                }
                record
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
