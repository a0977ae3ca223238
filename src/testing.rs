//! Test doubles shared by the unit tests

use crate::cache::{CacheError, SharedCache};
use crate::providers::{FetchOutcome, ProviderClient};
use crate::results::{magnet_link, ListingRecord, ProviderError, ProviderName, QualityTier};
use crate::telemetry::SearchTelemetry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A 40-hex info hash derived from `seed`
pub fn info_hash(seed: usize) -> String {
    format!("{:040x}", seed + 1)
}

/// `n` distinct, valid listings
pub fn sample_records(n: usize) -> Vec<ListingRecord> {
    (0..n)
        .map(|i| {
            let title = format!("Sample {} 1080p", i);
            ListingRecord::new(title.clone(), magnet_link(&info_hash(i), &title), ProviderName::Yts)
                .with_size("1.00 GB")
                .with_quality(QualityTier::FullHd)
                .with_peers(100 - i as u32, 3)
        })
        .collect()
}

/// A listing for `provider` with the given hash seed, tier and seeders
pub fn record(
    provider: ProviderName,
    seed: usize,
    quality: QualityTier,
    seeders: u32,
) -> ListingRecord {
    let title = format!("{} listing {}", provider, seed);
    ListingRecord::new(title.clone(), magnet_link(&info_hash(seed), &title), provider)
        .with_quality(quality)
        .with_peers(seeders, 0)
}

/// In-memory shared tier that can be switched off
pub struct MemorySharedCache {
    entries: Mutex<HashMap<String, String>>,
    available: AtomicBool,
}

impl MemorySharedCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Unavailable)
        }
    }
}

#[async_trait]
impl SharedCache for MemorySharedCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.check()?;
        self.insert_raw(key, value);
        Ok(())
    }
}

/// Shared tier whose calls never complete
pub struct HungSharedCache;

#[async_trait]
impl SharedCache for HungSharedCache {
    fn name(&self) -> &str {
        "hung"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        std::future::pending().await
    }
}

/// Provider client returning canned listings and counting its calls
pub struct StaticProvider {
    name: ProviderName,
    records: Vec<ListingRecord>,
    error: Option<ProviderError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(name: ProviderName, records: Vec<ListingRecord>) -> Self {
        Self {
            name,
            records,
            error: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty(name: ProviderName) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn failing(name: ProviderName, error: ProviderError) -> Self {
        Self {
            error: Some(error),
            ..Self::empty(name)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for StaticProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    async fn fetch(&self, _query: &str) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.error {
            Some(error) => FetchOutcome::failure(self.name, error, start.elapsed()),
            None => FetchOutcome::success(self.name, self.records.clone(), start.elapsed()),
        }
    }
}

/// Telemetry sink that remembers every call
#[derive(Default)]
pub struct RecordingTelemetry {
    pub starts: Mutex<Vec<String>>,
    pub results: Mutex<Vec<(String, usize)>>,
    pub outcomes: Mutex<Vec<(ProviderName, bool)>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> Vec<String> {
        self.starts.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<(String, usize)> {
        self.results.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<(ProviderName, bool)> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl SearchTelemetry for RecordingTelemetry {
    fn record_search_start(&self, query: &str) {
        self.starts.lock().unwrap().push(query.to_string());
    }

    fn record_search_result(&self, query: &str, count: usize) {
        self.results.lock().unwrap().push((query.to_string(), count));
    }

    fn record_provider_outcome(&self, provider: ProviderName, _elapsed: Duration, ok: bool) {
        self.outcomes.lock().unwrap().push((provider, ok));
    }
}
