//! Application state shared across handlers

use crate::cache::CacheLayer;
use crate::config::Settings;
use crate::search::Aggregator;
use crate::telemetry::Metrics;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search aggregator
    pub aggregator: Arc<Aggregator>,
    /// Cache shared with the aggregator, for status reporting
    pub cache: Arc<CacheLayer>,
    /// Telemetry store fed by the aggregator
    pub metrics: Arc<Metrics>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        settings: Settings,
        aggregator: Arc<Aggregator>,
        cache: Arc<CacheLayer>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            aggregator,
            cache,
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
