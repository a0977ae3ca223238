//! Web server module
//!
//! A thin JSON API over the aggregator: search, status, stats and health.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
