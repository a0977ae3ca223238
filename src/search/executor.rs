//! Search execution and orchestration

use super::fallback::synthetic_listings;
use super::models::{SearchQuery, SearchResponse};
use crate::cache::CacheLayer;
use crate::providers::{FetchOutcome, ProviderClient, ProviderRegistry};
use crate::results::{dedup, rank, ListingRecord, ProviderError, Timing, UnresponsiveProvider};
use crate::telemetry::SearchTelemetry;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout_at;
use tracing::{debug, info, warn};

/// Fans a query out to every provider and merges the results
pub struct Aggregator {
    registry: Arc<ProviderRegistry>,
    cache: Arc<CacheLayer>,
    telemetry: Arc<dyn SearchTelemetry>,
    /// Default bound on returned listings
    max_results: usize,
    /// Default deadline for a whole search
    deadline: Option<Duration>,
}

impl Aggregator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        cache: Arc<CacheLayer>,
        telemetry: Arc<dyn SearchTelemetry>,
    ) -> Self {
        Self {
            registry,
            cache,
            telemetry,
            max_results: crate::DEFAULT_MAX_RESULTS,
            deadline: None,
        }
    }

    /// Set the default maximum number of listings
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the default search deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Search all providers, returning at most the default maximum
    pub async fn search(&self, query: &str) -> Vec<ListingRecord> {
        self.search_detailed(&SearchQuery::new(query)).await.records
    }

    /// Search all providers, returning at most `max_results` listings
    pub async fn search_with_limit(&self, query: &str, max_results: usize) -> Vec<ListingRecord> {
        let query = SearchQuery::new(query).with_max_results(max_results);
        self.search_detailed(&query).await.records
    }

    /// Search with an overall deadline
    pub async fn search_with_deadline(&self, query: &str, deadline: Duration) -> Vec<ListingRecord> {
        let query = SearchQuery::new(query).with_deadline(deadline);
        self.search_detailed(&query).await.records
    }

    /// Execute a search and report how the result was produced.
    ///
    /// Never fails: provider failures leave their share empty, and an empty
    /// merge is replaced with synthetic listings. The deadline covers the
    /// cache lookup, the fan-out and the cache write; a lookup still pending
    /// at the deadline counts as a miss.
    pub async fn search_detailed(&self, query: &SearchQuery) -> SearchResponse {
        let start = Instant::now();
        let limit = query.max_results.unwrap_or(self.max_results);
        let key = query.cache_key();
        let cutoff = query
            .deadline
            .or(self.deadline)
            .map(|d| tokio::time::Instant::now() + d);

        self.telemetry.record_search_start(&query.raw);

        let cached = bounded(cutoff, self.cache.get(&key)).await.flatten();
        if let Some(mut records) = cached {
            records.truncate(limit);
            info!("Cache hit for \"{}\": {} listings", query.raw, records.len());
            self.telemetry.record_search_result(&query.raw, records.len());

            return SearchResponse {
                query: query.raw.clone(),
                records,
                from_cache: true,
                elapsed_ms: start.elapsed().as_millis() as u64,
                ..Default::default()
            };
        }

        info!(
            "Executing search \"{}\" on {} providers",
            query.raw,
            self.registry.len()
        );

        let outcomes = self.fan_out(&query.raw, cutoff).await;

        let mut response = SearchResponse {
            query: query.raw.clone(),
            ..Default::default()
        };
        let mut merged = Vec::new();

        for outcome in outcomes {
            if !outcome.from_cache {
                self.telemetry.record_provider_outcome(
                    outcome.provider,
                    outcome.elapsed,
                    outcome.error.is_none(),
                );
            }

            response.timings.push(Timing {
                provider: outcome.provider,
                time_ms: outcome.elapsed.as_millis() as u64,
                result_count: outcome.records.len(),
                cached: outcome.from_cache,
            });
            if let Some(error) = outcome.error {
                response.unresponsive.push(UnresponsiveProvider {
                    name: outcome.provider,
                    error,
                });
            }
            merged.extend(outcome.records);
        }

        if merged.is_empty() {
            info!("No provider returned listings for \"{}\", using fallback", query.raw);
            merged = synthetic_listings(&query.raw);
            response.used_fallback = true;
        }

        let mut ranked = rank(dedup(merged));
        debug!("{} listings after dedup for \"{}\"", ranked.len(), query.raw);

        let stored: Vec<ListingRecord> = ranked.iter().take(self.max_results).cloned().collect();
        ranked.truncate(limit);
        self.telemetry.record_search_result(&query.raw, ranked.len());
        info!("Search \"{}\" finished with {} listings", query.raw, ranked.len());

        match bounded(cutoff, self.cache.store(&key, &stored)).await {
            Some(true) => {}
            Some(false) => {
                debug!("Merged result for \"{}\" not stored in every cache tier", query.raw)
            }
            None => debug!("Deadline reached while storing merged result for \"{}\"", query.raw),
        }

        response.records = ranked;
        response.elapsed_ms = start.elapsed().as_millis() as u64;
        response
    }

    /// Call every provider concurrently, in registry order. A provider still
    /// running at the cutoff is reported as timed out with no listings.
    async fn fan_out(&self, query: &str, cutoff: Option<tokio::time::Instant>) -> Vec<FetchOutcome> {
        let started = Instant::now();

        let futures = self.registry.clients().iter().map(|client| async move {
            match cutoff {
                Some(cutoff) => match timeout_at(cutoff, client.fetch(query)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!("{} missed the search deadline", client.name());
                        FetchOutcome::failure(client.name(), ProviderError::Timeout, started.elapsed())
                    }
                },
                None => client.fetch(query).await,
            }
        });

        join_all(futures).await
    }
}

/// Run `fut` to completion, or until `cutoff` when one is set
async fn bounded<F: Future>(cutoff: Option<tokio::time::Instant>, fut: F) -> Option<F::Output> {
    match cutoff {
        Some(cutoff) => timeout_at(cutoff, fut).await.ok(),
        None => Some(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LocalCache, SharedCache, SharedTierState};
    use crate::results::{ProviderName, QualityTier};
    use crate::telemetry::NoopTelemetry;
    use crate::testing::{
        record, HungSharedCache, MemorySharedCache, RecordingTelemetry, StaticProvider,
    };
    use std::collections::HashSet;

    fn registry(providers: Vec<Arc<StaticProvider>>) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider);
        }
        Arc::new(registry)
    }

    fn local_cache() -> Arc<CacheLayer> {
        Arc::new(CacheLayer::local_only(LocalCache::new(100)))
    }

    #[tokio::test]
    async fn test_empty_providers_fall_back() {
        let yts = Arc::new(StaticProvider::empty(ProviderName::Yts));
        let tpb = Arc::new(StaticProvider::failing(
            ProviderName::ThePirateBay,
            ProviderError::NetworkError,
        ));
        let telemetry = Arc::new(RecordingTelemetry::new());
        let aggregator = Aggregator::new(
            registry(vec![yts, tpb]),
            local_cache(),
            telemetry.clone(),
        );

        let response = aggregator
            .search_detailed(&SearchQuery::new("zzzznotreal"))
            .await;

        assert_eq!(response.records.len(), 8);
        assert!(response.used_fallback);
        let tiers: HashSet<_> = response.records.iter().map(|r| r.quality_tier).collect();
        assert_eq!(tiers.len(), 4);
        assert_eq!(response.records[0].quality_tier, QualityTier::UltraHd);
        assert_eq!(response.unresponsive.len(), 1);
        assert_eq!(response.unresponsive[0].error, ProviderError::NetworkError);

        assert_eq!(telemetry.starts(), vec!["zzzznotreal".to_string()]);
        assert_eq!(telemetry.results(), vec![("zzzznotreal".to_string(), 8)]);
    }

    #[tokio::test]
    async fn test_second_search_served_from_cache() {
        let yts = Arc::new(StaticProvider::new(
            ProviderName::Yts,
            vec![
                record(ProviderName::Yts, 1, QualityTier::FullHd, 10),
                record(ProviderName::Yts, 2, QualityTier::UltraHd, 5),
            ],
        ));
        let eztv = Arc::new(StaticProvider::new(
            ProviderName::Eztv,
            vec![record(ProviderName::Eztv, 3, QualityTier::Hd, 99)],
        ));
        let aggregator = Aggregator::new(
            registry(vec![yts.clone(), eztv.clone()]),
            local_cache(),
            Arc::new(NoopTelemetry),
        );

        let first = aggregator.search("matrix").await;
        let second = aggregator.search("Matrix").await;

        assert_eq!(first, second);
        assert_eq!(yts.calls(), 1);
        assert_eq!(eztv.calls(), 1);
        assert_eq!(
            first.iter().map(|r| r.quality_tier).collect::<Vec<_>>(),
            vec![QualityTier::UltraHd, QualityTier::FullHd, QualityTier::Hd]
        );
    }

    #[tokio::test]
    async fn test_shared_tier_failure_mid_run() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = Arc::new(CacheLayer::new(
            LocalCache::new(100),
            Some(shared.clone() as Arc<dyn SharedCache>),
        ));
        let yts = Arc::new(StaticProvider::new(
            ProviderName::Yts,
            vec![record(ProviderName::Yts, 1, QualityTier::FullHd, 10)],
        ));
        let aggregator = Aggregator::new(
            registry(vec![yts.clone()]),
            cache.clone(),
            Arc::new(NoopTelemetry),
        );

        let first = aggregator.search("alien").await;
        assert!(shared.contains("search:alien"));

        shared.set_available(false);

        let second = aggregator.search("alien").await;
        assert_eq!(first, second);

        let other = aggregator.search("aliens").await;
        assert_eq!(other.len(), 1);
        assert_eq!(yts.calls(), 2);
        assert_eq!(cache.shared_state(), SharedTierState::Degraded);
    }

    #[tokio::test]
    async fn test_results_bounded_by_max() {
        let records = (0..30)
            .map(|i| record(ProviderName::ThePirateBay, i, QualityTier::Hd, i as u32))
            .collect();
        let tpb = Arc::new(StaticProvider::new(ProviderName::ThePirateBay, records));
        let aggregator = Aggregator::new(registry(vec![tpb]), local_cache(), Arc::new(NoopTelemetry))
            .with_max_results(20);

        let results = aggregator.search("big").await;
        assert_eq!(results.len(), 20);
        assert_eq!(results[0].seeder_count, 29);

        let limited = aggregator.search_with_limit("big", 5).await;
        assert_eq!(limited.len(), 5);
    }

    #[tokio::test]
    async fn test_merged_cache_entry_capped_at_max() {
        let records = (0..30)
            .map(|i| record(ProviderName::ThePirateBay, i, QualityTier::Hd, i as u32))
            .collect();
        let tpb = Arc::new(StaticProvider::new(ProviderName::ThePirateBay, records));
        let cache = local_cache();
        let telemetry = Arc::new(RecordingTelemetry::new());
        let aggregator = Aggregator::new(registry(vec![tpb]), cache.clone(), telemetry.clone())
            .with_max_results(20);

        let limited = aggregator.search_with_limit("big", 5).await;
        assert_eq!(limited.len(), 5);
        assert_eq!(telemetry.results(), vec![("big".to_string(), 5)]);

        let stored = cache.get("search:big").await.unwrap();
        assert_eq!(stored.len(), 20);
        assert_eq!(stored[0].seeder_count, 29);
        assert_eq!(stored[..5], limited[..]);

        // a later, larger request is still served the capped entry
        assert_eq!(aggregator.search("big").await.len(), 20);
    }

    #[tokio::test]
    async fn test_duplicates_keep_higher_priority_provider() {
        let yts = Arc::new(StaticProvider::new(
            ProviderName::Yts,
            vec![record(ProviderName::Yts, 7, QualityTier::FullHd, 1)],
        ));
        let tpb = Arc::new(StaticProvider::new(
            ProviderName::ThePirateBay,
            vec![
                record(ProviderName::ThePirateBay, 7, QualityTier::FullHd, 500),
                record(ProviderName::ThePirateBay, 8, QualityTier::FullHd, 2),
            ],
        ));
        let aggregator = Aggregator::new(
            registry(vec![tpb, yts]),
            local_cache(),
            Arc::new(NoopTelemetry),
        );

        let results = aggregator.search("dup").await;
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .any(|r| r.provider_name == ProviderName::Yts && r.seeder_count == 1));
        assert!(!results.iter().any(|r| r.seeder_count == 500));
    }

    #[tokio::test]
    async fn test_failing_provider_is_isolated() {
        let yts = Arc::new(StaticProvider::failing(ProviderName::Yts, ProviderError::Timeout));
        let eztv = Arc::new(StaticProvider::new(
            ProviderName::Eztv,
            vec![record(ProviderName::Eztv, 1, QualityTier::Sd, 3)],
        ));
        let telemetry = Arc::new(RecordingTelemetry::new());
        let aggregator = Aggregator::new(
            registry(vec![yts, eztv]),
            local_cache(),
            telemetry.clone(),
        );

        let response = aggregator.search_detailed(&SearchQuery::new("show")).await;
        assert!(!response.used_fallback);
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.timings.len(), 2);
        assert_eq!(
            telemetry.outcomes(),
            vec![(ProviderName::Yts, false), (ProviderName::Eztv, true)]
        );
    }

    #[tokio::test]
    async fn test_deadline_keeps_finished_providers() {
        let yts = Arc::new(StaticProvider::new(
            ProviderName::Yts,
            vec![record(ProviderName::Yts, 1, QualityTier::FullHd, 10)],
        ));
        let slow = Arc::new(
            StaticProvider::new(
                ProviderName::Eztv,
                vec![record(ProviderName::Eztv, 2, QualityTier::UltraHd, 10)],
            )
            .with_delay(Duration::from_secs(5)),
        );
        let aggregator = Aggregator::new(
            registry(vec![yts, slow]),
            local_cache(),
            Arc::new(NoopTelemetry),
        )
        .with_deadline(Duration::from_millis(100));

        let started = Instant::now();
        let response = aggregator.search_detailed(&SearchQuery::new("late")).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].provider_name, ProviderName::Yts);
        assert_eq!(response.unresponsive[0].name, ProviderName::Eztv);
        assert_eq!(response.unresponsive[0].error, ProviderError::Timeout);
    }

    #[tokio::test]
    async fn test_deadline_bounds_stalled_shared_cache() {
        let cache = Arc::new(
            CacheLayer::new(
                LocalCache::new(100),
                Some(Arc::new(HungSharedCache) as Arc<dyn SharedCache>),
            )
            .with_op_timeout(Duration::from_secs(30)),
        );
        let yts = Arc::new(StaticProvider::new(
            ProviderName::Yts,
            vec![record(ProviderName::Yts, 1, QualityTier::FullHd, 10)],
        ));
        let aggregator = Aggregator::new(registry(vec![yts]), cache.clone(), Arc::new(NoopTelemetry))
            .with_deadline(Duration::from_millis(100));

        let results = tokio::time::timeout(Duration::from_secs(2), aggregator.search("matrix"))
            .await
            .expect("search outlived its deadline");
        assert!(!results.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_with_no_finished_provider_falls_back() {
        let slow = Arc::new(
            StaticProvider::new(
                ProviderName::Yts,
                vec![record(ProviderName::Yts, 1, QualityTier::FullHd, 10)],
            )
            .with_delay(Duration::from_secs(5)),
        );
        let aggregator = Aggregator::new(registry(vec![slow]), local_cache(), Arc::new(NoopTelemetry));

        let results = aggregator
            .search_with_deadline("stuck", Duration::from_millis(50))
            .await;
        assert_eq!(results.len(), 8);
    }
}
