//! Domain layer - Core search semantics and entities

pub mod cache;
pub mod error;
pub mod search;

pub use cache::{availability_key, normalize, share, QueryKey, SharedResult};
pub use error::{DomainError, FetchError};
pub use search::{
    BranchQuantity, Envelope, FetchOutcome, PartItem, PeakAvailability, SearchBy, SearchFetcher,
    SearchPage, SearchQuery, SortDirection, SortSpec, DEFAULT_PAGE_SIZE,
};
