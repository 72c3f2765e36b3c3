//! iTunes Search API HTTP client
//!
//! No API key required. Apple throttles at roughly 20 requests per minute
//! and answers 403 when exceeded.
//!
//! API: https://itunes.apple.com/search

use super::domain::{CatalogError, MetadataCandidate};
use super::{adapter, dto};

/// Maximum results requested per search
const SEARCH_LIMIT: u32 = 50;

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    /// Create a new client
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            base_url: "https://itunes.apple.com/search".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search songs by term in the given storefront country
    pub async fn search(
        &self,
        term: &str,
        country: &str,
    ) -> Result<Vec<MetadataCandidate>, CatalogError> {
        let response = self.send_search_request(term, country).await?;
        tracing::debug!("Catalog returned {} results for {:?}", response.result_count, term);
        adapter::to_candidates(response)
    }

    fn search_url(&self, term: &str, country: &str) -> String {
        format!(
            "{}?term={}&country={}&media=music&entity=song&limit={}",
            self.base_url,
            urlencoding::encode(term),
            urlencoding::encode(&country.to_ascii_uppercase()),
            SEARCH_LIMIT
        )
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(
        &self,
        term: &str,
        country: &str,
    ) -> Result<dto::SearchResponse, CatalogError> {
        let url = self.search_url(term, country);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            return Err(CatalogError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new()
    }
}
