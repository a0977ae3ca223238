//! HTTP networking module
//!
//! Provides the outbound HTTP client used by every listing provider.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{default_user_agents, pick_user_agent};
