//! Search domain - queries, remote envelopes and the fetcher port

mod envelope;
mod fetcher;
mod item;
mod query;

pub use envelope::{
    failure_message, is_cacheable, Envelope, FetchOutcome, WireEnvelope, GENERIC_FAILURE_MESSAGE,
};
pub use fetcher::SearchFetcher;
pub use item::{BranchQuantity, PartItem, PeakAvailability, SearchPage};
pub use query::{SearchBy, SearchQuery, SortDirection, SortSpec, DEFAULT_PAGE_SIZE};

#[cfg(test)]
pub use fetcher::mock::ScriptedFetcher;
#[cfg(test)]
pub use fetcher::MockSearchFetcher;
