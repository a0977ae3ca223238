//! Two-tier listing cache
//!
//! Lookups consult the in-process tier first and the shared tier second. A
//! shared hit is not copied back into the local tier; each tier is warmed
//! independently by writes. Writes land in the local tier first, then in the
//! shared tier if it is reachable. Every shared call is bounded by an
//! operation timeout. When the shared tier fails or stalls, the layer keeps
//! serving from the local tier and logs the transition once.

mod error;
mod local;
mod shared;

pub use error::CacheError;
pub use local::{CacheStats, LocalCache};
pub use shared::{RedisCache, SharedCache};

use crate::results::ListingRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Upper bound on a single shared tier call
pub const DEFAULT_SHARED_OP_TIMEOUT: Duration = Duration::from_secs(1);

/// Cache key of the merged result for a query
pub fn search_cache_key(query: &str) -> String {
    format!("search:{}", query.to_lowercase())
}

/// Cache key of a single provider's result for a query
pub fn provider_cache_key(prefix: &str, query: &str) -> String {
    format!("{}:{}", prefix, query.to_lowercase())
}

/// Connection state of the shared tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedTierState {
    Connected,
    Degraded,
    Disconnected,
}

/// Read-through / write-through cache over a local and an optional shared tier
pub struct CacheLayer {
    local: LocalCache,
    shared: Option<Arc<dyn SharedCache>>,
    ttl: Duration,
    op_timeout: Duration,
    degraded: AtomicBool,
}

impl CacheLayer {
    /// Create a cache layer. `shared` is `None` when no shared tier could be
    /// established at startup.
    pub fn new(local: LocalCache, shared: Option<Arc<dyn SharedCache>>) -> Self {
        if shared.is_none() {
            info!("No shared cache configured, running with local cache only");
        }

        Self {
            local,
            shared,
            ttl: Duration::from_secs(crate::DEFAULT_CACHE_TTL),
            op_timeout: DEFAULT_SHARED_OP_TIMEOUT,
            degraded: AtomicBool::new(false),
        }
    }

    /// Create a layer with only the local tier
    pub fn local_only(local: LocalCache) -> Self {
        Self::new(local, None)
    }

    /// Set the TTL used by [`CacheLayer::store`]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the upper bound on a single shared tier call
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Look up `key` in the local tier, then the shared tier
    pub async fn get(&self, key: &str) -> Option<Vec<ListingRecord>> {
        if let Some(payload) = self.local.get(key).await {
            match decode(&payload) {
                Ok(records) => {
                    debug!("Local cache hit for {}", key);
                    return Some(records);
                }
                Err(e) => warn!("Discarding unreadable local cache entry {}: {}", key, e),
            }
        }

        let shared = self.shared.as_ref()?;
        let result = timeout(self.op_timeout, shared.get(key))
            .await
            .unwrap_or(Err(CacheError::Unavailable));
        match result {
            Ok(Some(payload)) => {
                self.mark_available();
                match decode(&payload) {
                    Ok(records) => {
                        debug!("Shared cache hit for {}", key);
                        Some(records)
                    }
                    Err(e) => {
                        warn!("Discarding unreadable shared cache entry {}: {}", key, e);
                        None
                    }
                }
            }
            Ok(None) => {
                self.mark_available();
                None
            }
            Err(e) => {
                self.mark_degraded(shared.name(), &e);
                None
            }
        }
    }

    /// Store `records` under `key` in every reachable tier.
    ///
    /// Returns `true` when every configured tier accepted the write. The
    /// result is informational only.
    pub async fn set(&self, key: &str, records: &[ListingRecord], ttl: Duration) -> bool {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode cache entry {}: {}", key, e);
                return false;
            }
        };

        self.local.set(key, payload.clone(), ttl).await;

        let Some(shared) = &self.shared else {
            return true;
        };
        let result = timeout(self.op_timeout, shared.set(key, &payload, ttl))
            .await
            .unwrap_or(Err(CacheError::Unavailable));
        match result {
            Ok(()) => {
                self.mark_available();
                true
            }
            Err(e) => {
                self.mark_degraded(shared.name(), &e);
                false
            }
        }
    }

    /// Store `records` with the default TTL
    pub async fn store(&self, key: &str, records: &[ListingRecord]) -> bool {
        self.set(key, records, self.ttl).await
    }

    /// Clear the local tier. The shared tier expires on its own.
    ///
    /// Nothing in the process schedules this; it is meant to be driven by an
    /// external scheduler such as a daily off-peak flush job.
    pub fn flush_all(&self) {
        info!("Flushing local cache");
        self.local.flush_all();
    }

    /// Local tier counters
    pub fn stats(&self) -> CacheStats {
        self.local.stats()
    }

    pub fn shared_state(&self) -> SharedTierState {
        match &self.shared {
            None => SharedTierState::Disconnected,
            Some(_) if self.degraded.load(Ordering::Relaxed) => SharedTierState::Degraded,
            Some(_) => SharedTierState::Connected,
        }
    }

    fn mark_degraded(&self, backend: &str, err: &CacheError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(
                "Shared cache ({}) unavailable, continuing with local cache only: {}",
                backend, err
            );
        } else {
            debug!("Shared cache ({}) still unavailable: {}", backend, err);
        }
    }

    fn mark_available(&self) {
        if self.degraded.swap(false, Ordering::Relaxed) {
            info!("Shared cache available again");
        }
    }
}

fn decode(payload: &str) -> Result<Vec<ListingRecord>, CacheError> {
    Ok(serde_json::from_str(payload)?)
}
