//! HTTP request handlers

use super::state::AppState;
use crate::results::ListingRecord;
use crate::search::SearchQuery;
use crate::telemetry::{ProviderStats, SearchRecord};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::info;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Maximum number of listings
    pub limit: Option<usize>,
}

/// Search results response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Number of listings returned
    pub results: usize,
    pub torrents: Vec<ListingRecord>,
    pub timestamp: DateTime<Utc>,
}

/// Search handler
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Query parameter \"q\" is required" })),
            )
                .into_response()
        }
    };

    let max_results = state.aggregator.max_results();
    let limit = params.limit.map_or(max_results, |l| l.min(max_results));

    let search_query = SearchQuery::new(query.clone()).with_max_results(limit);
    let response = state.aggregator.search_detailed(&search_query).await;
    info!(
        "Search \"{}\" answered with {} listings in {}ms",
        query,
        response.len(),
        response.elapsed_ms
    );

    Json(SearchResponse {
        query,
        results: response.records.len(),
        torrents: response.records,
        timestamp: Utc::now(),
    })
    .into_response()
}

/// A featured title for the landing page
#[derive(Debug, Serialize)]
pub struct PopularTitle {
    pub id: &'static str,
    pub title: &'static str,
    pub year: u16,
}

const POPULAR: [PopularTitle; 4] = [
    PopularTitle {
        id: "tt0133093",
        title: "The Matrix",
        year: 1999,
    },
    PopularTitle {
        id: "tt0120737",
        title: "The Lord of the Rings: The Fellowship of the Ring",
        year: 2001,
    },
    PopularTitle {
        id: "tt0468569",
        title: "The Dark Knight",
        year: 2008,
    },
    PopularTitle {
        id: "tt0944947",
        title: "Game of Thrones",
        year: 2011,
    },
];

/// Static list of featured titles
pub async fn popular() -> impl IntoResponse {
    Json(json!({ "movies": POPULAR }))
}

/// Instance status handler
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "instance": state.instance_name(),
        "version": crate::VERSION,
        "timestamp": Utc::now(),
        "uptime": state.uptime().as_secs(),
        "providers": state.aggregator.registry().names(),
        "cache": {
            "local": state.cache.stats(),
            "shared": state.cache.shared_state(),
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_searches: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub uptime: u64,
    pub recent_searches: Vec<SearchRecord>,
    pub providers: HashMap<String, ProviderStats>,
}

/// Search statistics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.cache.stats();
    let providers = state
        .metrics
        .provider_stats()
        .into_iter()
        .map(|(name, stats)| (name.to_string(), stats))
        .collect();

    Json(StatsResponse {
        total_searches: state.metrics.total_searches(),
        cache_hits: cache.hits,
        cache_misses: cache.misses,
        uptime: state.uptime().as_secs(),
        recent_searches: state.metrics.recent_searches(),
        providers,
    })
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
