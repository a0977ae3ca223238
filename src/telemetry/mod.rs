//! Search telemetry
//!
//! Records search intent, final result counts and per-provider health.
//! Every call is fire-and-forget: implementations must not block and must
//! not fail the search they observe.

use crate::results::ProviderName;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Number of searches kept in the recent-search log
const RECENT_CAPACITY: usize = 100;

/// Number of response times kept per provider
const RESPONSE_WINDOW: usize = 100;

/// Sink for search telemetry
pub trait SearchTelemetry: Send + Sync {
    /// A search for `query` has started
    fn record_search_start(&self, query: &str);

    /// A search for `query` produced `count` listings
    fn record_search_result(&self, query: &str, count: usize);

    /// A provider call finished
    fn record_provider_outcome(&self, _provider: ProviderName, _elapsed: Duration, _ok: bool) {}
}

/// Telemetry sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl SearchTelemetry for NoopTelemetry {
    fn record_search_start(&self, _query: &str) {}

    fn record_search_result(&self, _query: &str, _count: usize) {}
}

/// One entry of the recent-search log
#[derive(Debug, Clone, Serialize)]
pub struct SearchRecord {
    pub query: String,
    pub result_count: usize,
    pub created_at: DateTime<Utc>,
}

/// In-memory telemetry store
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    /// Most recent searches, oldest first
    recent: RwLock<VecDeque<SearchRecord>>,
    /// Provider response times (rolling window in ms)
    response_times: RwLock<HashMap<ProviderName, VecDeque<u64>>>,
    /// Provider error counts
    errors: RwLock<HashMap<ProviderName, u64>>,
    /// Provider success counts
    successes: RwLock<HashMap<ProviderName, u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            recent: RwLock::new(VecDeque::with_capacity(RECENT_CAPACITY)),
            response_times: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
            successes: RwLock::new(HashMap::new()),
        }
    }

    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Recent searches, newest first
    pub fn recent_searches(&self) -> Vec<SearchRecord> {
        let recent = self.recent.read().unwrap_or_else(PoisonError::into_inner);
        recent.iter().rev().cloned().collect()
    }

    /// Average response time for a provider
    pub fn avg_response_time(&self, provider: ProviderName) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(&provider).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Percentage of successful calls for a provider
    pub fn reliability(&self, provider: ProviderName) -> f64 {
        let errors = self.errors.read().unwrap_or_else(PoisonError::into_inner);
        let successes = self.successes.read().unwrap_or_else(PoisonError::into_inner);

        let error_count = errors.get(&provider).copied().unwrap_or(0);
        let success_count = successes.get(&provider).copied().unwrap_or(0);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Statistics for every provider seen so far
    pub fn provider_stats(&self) -> HashMap<ProviderName, ProviderStats> {
        let providers: Vec<ProviderName> = {
            let times = self
                .response_times
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            times.keys().copied().collect()
        };

        providers
            .into_iter()
            .map(|provider| {
                (
                    provider,
                    ProviderStats {
                        avg_response_time: self.avg_response_time(provider),
                        reliability: self.reliability(provider),
                    },
                )
            })
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTelemetry for Metrics {
    fn record_search_start(&self, query: &str) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);

        let mut recent = self.recent.write().unwrap_or_else(PoisonError::into_inner);
        if recent.len() >= RECENT_CAPACITY {
            recent.pop_front();
        }
        recent.push_back(SearchRecord {
            query: query.to_string(),
            result_count: 0,
            created_at: Utc::now(),
        });
    }

    fn record_search_result(&self, query: &str, count: usize) {
        let mut recent = self.recent.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(record) = recent.iter_mut().rev().find(|r| r.query == query) {
            record.result_count = count;
        }
    }

    fn record_provider_outcome(&self, provider: ProviderName, elapsed: Duration, ok: bool) {
        {
            let mut times = self
                .response_times
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let entry = times.entry(provider).or_default();
            if entry.len() >= RESPONSE_WINDOW {
                entry.pop_front();
            }
            entry.push_back(elapsed.as_millis() as u64);
        }

        let counters = if ok { &self.successes } else { &self.errors };
        let mut counters = counters.write().unwrap_or_else(PoisonError::into_inner);
        *counters.entry(provider).or_insert(0) += 1;
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStats {
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}
