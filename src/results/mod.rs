//! Listing types and the post-processing applied to merged provider output
//!
//! Quality inference, deduplication and ranking are pure functions over
//! listing sequences.

mod dedup;
mod quality;
mod rank;
mod types;

pub use dedup::{content_id, dedup};
pub use quality::classify;
pub use rank::rank;
pub use types::*;
