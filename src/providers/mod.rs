//! Torrent listing providers
//!
//! Each provider knows how to query one upstream API and normalize its
//! payload into [`ListingRecord`](crate::results::ListingRecord)s. The
//! [`HttpProviderClient`] wraps a provider with transport, timeouts and
//! per-provider caching, and never fails.

mod client;
mod de;
pub mod eztv;
mod loader;
mod registry;
mod traits;
pub mod tpb;
pub mod yts;

pub use client::{FetchOutcome, HttpProviderClient, ProviderClient};
pub use eztv::Eztv;
pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use tpb::ThePirateBay;
pub use traits::{Provider, ProviderRequest, ProviderResponse};
pub use yts::Yts;
