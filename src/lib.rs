//! Torrentio-RS: a multi-provider torrent listing aggregator
//!
//! Queries several public torrent index APIs concurrently, normalizes their
//! listings, drops duplicates by info hash, ranks by quality and popularity,
//! and caches the outcome in a local tier backed by an optional shared one.

pub mod cache;
pub mod config;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod telemetry;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Settings;
pub use providers::{Provider, ProviderClient};
pub use results::{ListingRecord, ProviderName, QualityTier};
pub use search::{Aggregator, SearchQuery, SearchResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;

/// Default bound on listings returned by a search
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Default cache entry lifetime in seconds
pub const DEFAULT_CACHE_TTL: u64 = 7200;
