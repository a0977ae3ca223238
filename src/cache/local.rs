//! In-process cache tier

use moka::future::Cache;
use moka::Expiry;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A serialized listing sequence and its lifetime
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: String,
    pub ttl: Duration,
}

/// Expires each entry after its own TTL
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Hit and miss counters for the local tier
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Local cache of serialized listing sequences
pub struct LocalCache {
    cache: Cache<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LocalCache {
    /// Create a new local cache holding at most `max_capacity` entries
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a cached payload, counting the hit or miss
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.payload)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a payload that expires after `ttl`
    pub async fn set(&self, key: &str, payload: String, ttl: Duration) {
        let entry = CacheEntry {
            payload,
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
    }

    /// Drop every entry
    pub fn flush_all(&self) {
        self.cache.invalidate_all();
    }

    /// Current counters. The entry count is approximate.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}
