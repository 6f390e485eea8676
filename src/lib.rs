//! Parts Search Client
//!
//! Client-side plumbing for a paginated parts search API:
//! - Canonical query keys so equivalent searches share one cache entry
//! - A TTL and capacity bounded result cache that never stores failures
//! - A debounced pipeline where only the latest accepted search reaches the view

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{DomainError, SearchFetcher};
use infrastructure::http::HttpSearchFetcher;
use infrastructure::services::SearchService;

/// Builds the HTTP-backed search service described by the configuration
pub fn build_search_service(config: &AppConfig) -> Result<SearchService, DomainError> {
    let fetcher = match config.api.timeout() {
        Some(timeout) => HttpSearchFetcher::with_timeout(&config.api.base_url, timeout)?,
        None => HttpSearchFetcher::new(&config.api.base_url),
    };

    tracing::debug!(
        base_url = %fetcher.base_url(),
        ttl_ms = config.cache.ttl_ms,
        max_entries = config.cache.max_entries,
        "Search service configured"
    );

    let fetcher: Arc<dyn SearchFetcher> = Arc::new(fetcher);

    Ok(SearchService::with_config(
        fetcher,
        config.cache.to_cache_config(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_service() {
        let mut config = AppConfig::default();
        config.cache.max_entries = 3;
        config.api.timeout_ms = Some(2_000);

        let service = build_search_service(&config).unwrap();

        assert_eq!(service.search_cache().config().max_entries, 3);
        assert!(service.search_cache().is_empty());
    }
}
