//! Provider clients: transport, timeout, caching and fail-soft behavior

use super::traits::Provider;
use crate::cache::{provider_cache_key, CacheLayer};
use crate::network::HttpClient;
use crate::results::{ListingRecord, ProviderError, ProviderName};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// What a single provider produced for a query
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub provider: ProviderName,
    /// Listings, empty on failure
    pub records: Vec<ListingRecord>,
    /// Failure observed while fetching, for logging only
    pub error: Option<ProviderError>,
    /// Whether the listings came from the provider cache
    pub from_cache: bool,
    pub elapsed: Duration,
}

impl FetchOutcome {
    pub fn success(provider: ProviderName, records: Vec<ListingRecord>, elapsed: Duration) -> Self {
        Self {
            provider,
            records,
            error: None,
            from_cache: false,
            elapsed,
        }
    }

    pub fn failure(provider: ProviderName, error: ProviderError, elapsed: Duration) -> Self {
        Self {
            provider,
            records: Vec::new(),
            error: Some(error),
            from_cache: false,
            elapsed,
        }
    }

    pub fn cached(provider: ProviderName, records: Vec<ListingRecord>, elapsed: Duration) -> Self {
        Self {
            provider,
            records,
            error: None,
            from_cache: true,
            elapsed,
        }
    }
}

/// A source of listings for the aggregator.
///
/// `fetch` never fails: any error is reported in the outcome alongside an
/// empty listing sequence.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn name(&self) -> ProviderName;

    async fn fetch(&self, query: &str) -> FetchOutcome;
}

/// Provider client that talks HTTP and caches per provider
pub struct HttpProviderClient {
    provider: Arc<dyn Provider>,
    http: HttpClient,
    cache: Arc<CacheLayer>,
    timeout: Duration,
}

impl HttpProviderClient {
    pub fn new(provider: Arc<dyn Provider>, http: HttpClient, cache: Arc<CacheLayer>) -> Self {
        let timeout = Duration::from_secs_f64(provider.timeout());
        Self {
            provider,
            http,
            cache,
            timeout,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<ListingRecord>, ProviderError> {
        let name = self.provider.name();

        let request = self.provider.request(query).map_err(|e| {
            warn!("Failed to build request for {}: {}", name, e);
            ProviderError::InvalidRequest
        })?;

        let response = match timeout(self.timeout, self.http.execute_with_timeout(request, self.timeout)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!("Transport error from {}: {:#}", name, e);
                return Err(classify_transport_error(&e));
            }
            Err(_) => return Err(ProviderError::Timeout),
        };

        if response.is_rate_limited() {
            return Err(ProviderError::TooManyRequests);
        }
        if response.status == 403 {
            return Err(ProviderError::AccessDenied);
        }
        if !response.is_success() {
            return Err(ProviderError::HttpError(response.status));
        }

        self.provider.response(response).map_err(|e| {
            debug!("Unparseable response from {}: {}", name, e);
            ProviderError::ParseError
        })
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn name(&self) -> ProviderName {
        self.provider.name()
    }

    async fn fetch(&self, query: &str) -> FetchOutcome {
        let name = self.provider.name();
        let start = Instant::now();
        let cache_key = provider_cache_key(name.cache_prefix(), query);

        if let Some(records) = self.cache.get(&cache_key).await {
            debug!("Cache hit for {}: \"{}\"", name, query);
            return FetchOutcome::cached(name, records, start.elapsed());
        }

        debug!("Searching {} for \"{}\" with timeout {:?}", name, query, self.timeout);

        match self.try_fetch(query).await {
            Ok(records) => {
                info!("{}: {} listings found", name, records.len());
                if !records.is_empty() {
                    self.cache.store(&cache_key, &records).await;
                }
                FetchOutcome::success(name, records, start.elapsed())
            }
            Err(error) => {
                warn!("{} failed for \"{}\": {}", name, query, error);
                FetchOutcome::failure(name, error, start.elapsed())
            }
        }
    }
}

fn classify_transport_error(err: &anyhow::Error) -> ProviderError {
    match err.downcast_ref::<reqwest::Error>() {
        Some(e) if e.is_timeout() => ProviderError::Timeout,
        Some(e) if e.is_decode() => ProviderError::ParseError,
        Some(e) => match e.status() {
            Some(status) => ProviderError::HttpError(status.as_u16()),
            None => ProviderError::NetworkError,
        },
        None => ProviderError::NetworkError,
    }
}
