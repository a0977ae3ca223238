//! Search query and response models

use crate::cache::search_cache_key;
use crate::results::{ListingRecord, Timing, UnresponsiveProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A caller's search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The query string as typed
    pub raw: String,
    /// Upper bound on returned listings, the aggregator default when unset
    pub max_results: Option<usize>,
    /// Overall deadline for the provider fan-out
    #[serde(skip)]
    pub deadline: Option<Duration>,
}

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            max_results: None,
            deadline: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cache key of the merged result. Only case is normalized.
    pub fn cache_key(&self) -> String {
        search_cache_key(&self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Detailed outcome of a search
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub records: Vec<ListingRecord>,
    /// Providers that failed, with the failure kind
    pub unresponsive: Vec<UnresponsiveProvider>,
    pub timings: Vec<Timing>,
    /// Served from the merged-result cache
    pub from_cache: bool,
    /// Synthetic listings were generated because no provider returned any
    pub used_fallback: bool,
    pub elapsed_ms: u64,
}

impl SearchResponse {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
