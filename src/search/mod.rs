//! Search orchestration module
//!
//! Fans a query out to every provider, merges the listings in provider
//! priority order, then deduplicates, ranks and caches them.

mod executor;
mod fallback;
mod models;

pub use executor::Aggregator;
pub use fallback::{synthetic_listings, FALLBACK_COUNT};
pub use models::*;
