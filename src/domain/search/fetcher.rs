//! Remote fetcher abstraction

use async_trait::async_trait;

use super::envelope::FetchOutcome;
use super::item::{PeakAvailability, SearchPage};
use super::query::SearchQuery;

/// Issues requests against the remote parts search API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchFetcher: Send + Sync {
    /// Runs a paginated search
    async fn search(&self, query: &SearchQuery) -> FetchOutcome<SearchPage>;

    /// Fetches per-branch availability for one part number
    async fn peak_availability(&self, part_number: &str) -> FetchOutcome<PeakAvailability>;
}
