//! Torrentio-RS: a multi-provider torrent listing aggregator
//!
//! This is the main entry point for the application.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use torrentio_rs::{
    cache::{CacheLayer, LocalCache, RedisCache, SharedCache},
    config::{self, Settings},
    network::HttpClient,
    providers::ProviderLoader,
    search::Aggregator,
    telemetry::Metrics,
    web::{create_router, AppState},
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Settings come first so their log level can seed the filter
    let settings_path = config::find_settings_file();
    let settings = config::load_from(settings_path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Torrentio-RS v{}", torrentio_rs::VERSION);
    match &settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    let client = HttpClient::with_settings(&settings.outgoing)?;

    let shared = connect_shared_cache(&settings).await;
    let mut cache = CacheLayer::new(LocalCache::new(settings.cache.max_capacity), shared)
        .with_ttl(Duration::from_secs(settings.search.cache_ttl));
    if let Some(redis) = &settings.redis {
        cache = cache.with_op_timeout(Duration::from_secs_f64(redis.op_timeout));
    }
    let cache = Arc::new(cache);

    let registry = ProviderLoader::load(&settings, &client, cache.clone())?;
    if registry.is_empty() {
        warn!("No providers enabled, every search will use fallback listings");
    }

    let metrics = Arc::new(Metrics::new());
    let mut aggregator = Aggregator::new(Arc::new(registry), cache.clone(), metrics.clone())
        .with_max_results(settings.search.max_results);
    if let Some(deadline) = settings.search.search_timeout {
        aggregator = aggregator.with_deadline(Duration::from_secs_f64(deadline));
    }

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::new(settings, Arc::new(aggregator), cache, metrics);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Connect to the shared cache tier, if one is configured.
///
/// A failed connection is not fatal: the service runs with the local tier only.
async fn connect_shared_cache(settings: &Settings) -> Option<Arc<dyn SharedCache>> {
    let redis = settings.redis.as_ref()?;
    let timeout = Duration::from_secs_f64(redis.connect_timeout);

    match RedisCache::connect(&redis.url, timeout).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            warn!("Shared cache unavailable at {}: {}", redis.url, e);
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
