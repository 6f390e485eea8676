//! HTTP infrastructure - Remote search API client

mod fetcher;

pub use fetcher::HttpSearchFetcher;
