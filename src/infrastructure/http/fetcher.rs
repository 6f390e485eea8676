use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::search::{
    Envelope, FetchOutcome, PeakAvailability, SearchFetcher, SearchPage, SearchQuery,
    WireEnvelope,
};
use crate::domain::{DomainError, FetchError};

const SEARCH_PATH: &str = "/api/parts/search";
const PEAK_AVAILABILITY_PATH: &str = "/api/parts/peak-availability";

/// Remote fetcher speaking to the parts search API over HTTP using reqwest
#[derive(Debug, Clone)]
pub struct HttpSearchFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: trim_base_url(base_url.into()),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: trim_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> FetchOutcome<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        // Failure envelopes may arrive with an error status; prefer their message
        match serde_json::from_str::<WireEnvelope<T>>(&body) {
            Ok(wire) => Ok(Envelope::from(wire)),
            Err(e) if status.is_success() => Err(FetchError::decode(e.to_string())),
            Err(_) => Err(FetchError::status(status.as_u16(), body)),
        }
    }
}

fn trim_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl SearchFetcher for HttpSearchFetcher {
    async fn search(&self, query: &SearchQuery) -> FetchOutcome<SearchPage> {
        self.get_envelope(SEARCH_PATH, &query.to_query_params()).await
    }

    async fn peak_availability(&self, part_number: &str) -> FetchOutcome<PeakAvailability> {
        self.get_envelope(
            PEAK_AVAILABILITY_PATH,
            &[("partNumber", part_number.to_string())],
        )
        .await
    }
}
