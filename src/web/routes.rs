//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(state.settings.server.allowed_origins.as_deref()))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", get(handlers::search))
        .route("/api/popular", get(handlers::popular))
        .route("/api/status", get(handlers::status))
        .route("/api/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn allowed_origins(origins: Option<&[String]>) -> AllowOrigin {
    let Some(origins) = origins else {
        return AllowOrigin::from(Any);
    };

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    AllowOrigin::list(values)
}
