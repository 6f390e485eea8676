//! Cache-through access to the remote search API

use std::sync::Arc;

use crate::domain::cache::{availability_key, normalize, share};
use crate::domain::search::{
    is_cacheable, Envelope, FetchOutcome, PeakAvailability, SearchFetcher, SearchPage,
    SearchQuery,
};
use crate::infrastructure::cache::{InMemoryQueryCache, QueryCacheConfig};

/// Resolves searches and availability lookups through their caches.
///
/// Cloning is cheap and every clone shares the same caches and fetcher.
#[derive(Clone)]
pub struct SearchService {
    fetcher: Arc<dyn SearchFetcher>,
    searches: Arc<InMemoryQueryCache<FetchOutcome<SearchPage>>>,
    availability: Arc<InMemoryQueryCache<FetchOutcome<PeakAvailability>>>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("searches", &self.searches)
            .field("availability", &self.availability)
            .finish()
    }
}

impl SearchService {
    /// Creates a service with default cache configuration
    pub fn new(fetcher: Arc<dyn SearchFetcher>) -> Self {
        Self::with_config(fetcher, QueryCacheConfig::default())
    }

    /// Creates a service whose search and availability caches both use `config`
    pub fn with_config(fetcher: Arc<dyn SearchFetcher>, config: QueryCacheConfig) -> Self {
        Self {
            fetcher,
            searches: Arc::new(InMemoryQueryCache::with_config(config.clone())),
            availability: Arc::new(InMemoryQueryCache::with_config(config)),
        }
    }

    /// Runs `query`, served from cache when an identical query is live or in flight
    pub async fn search(&self, query: SearchQuery) -> FetchOutcome<SearchPage> {
        let key = normalize(&query);

        if let Some(cached) = self.searches.lookup(&key) {
            return cached.await;
        }

        tracing::debug!(key = %key, criteria = %query.criteria, "Fetching search page");

        let fetcher = Arc::clone(&self.fetcher);
        let fetch = share(async move { fetcher.search(&query).await });

        let outcome = self
            .searches
            .store(key, fetch, is_cacheable::<SearchPage>)
            .await;

        log_failure("search", &outcome);
        outcome
    }

    /// Fetches peak availability for one part, served from cache when possible
    pub async fn peak_availability(&self, part_number: &str) -> FetchOutcome<PeakAvailability> {
        let key = availability_key(part_number);

        if let Some(cached) = self.availability.lookup(&key) {
            return cached.await;
        }

        tracing::debug!(key = %key, "Fetching peak availability");

        let fetcher = Arc::clone(&self.fetcher);
        let part_number = part_number.to_string();
        let fetch = share(async move {
            fetcher
                .peak_availability(&part_number)
                .await
                .map(|envelope| match envelope {
                    Envelope::Success { data } => Envelope::success(data.sorted_by_quantity()),
                    Envelope::Failure { message } => Envelope::Failure { message },
                })
        });

        let outcome = self
            .availability
            .store(key, fetch, is_cacheable::<PeakAvailability>)
            .await;

        log_failure("peak_availability", &outcome);
        outcome
    }

    pub fn search_cache(&self) -> &InMemoryQueryCache<FetchOutcome<SearchPage>> {
        &self.searches
    }

    pub fn availability_cache(&self) -> &InMemoryQueryCache<FetchOutcome<PeakAvailability>> {
        &self.availability
    }

    /// Discards every cached and pending result
    pub fn clear(&self) {
        self.searches.clear();
        self.availability.clear();
    }
}

fn log_failure<T>(operation: &'static str, outcome: &FetchOutcome<T>) {
    match outcome {
        Ok(Envelope::Success { .. }) => {}
        Ok(Envelope::Failure { message }) => {
            tracing::warn!(operation, message = %message, "Remote call reported failure");
        }
        Err(error) => {
            tracing::warn!(operation, error = %error, "Remote call failed");
        }
    }
}
