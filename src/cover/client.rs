//! HTTP client for media pages and cover images

use super::{CoverError, CoverImage, scrape};

/// Fetches media pages and the images they advertise
pub struct PageCoverClient {
    http_client: reqwest::Client,
}

impl PageCoverClient {
    /// Create a new client
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http_client }
    }

    /// Scrape the `og:image` URL from a media page
    pub async fn cover_url(&self, page_url: &str) -> Result<String, CoverError> {
        let response = self
            .http_client
            .get(page_url)
            .send()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::PageUnavailable {
                url: page_url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;

        scrape::extract_og_image(&html).ok_or_else(|| CoverError::NotFound(page_url.to_string()))
    }

    /// Download an image from a URL
    pub async fn fetch_image(&self, image_url: &str) -> Result<CoverImage, CoverError> {
        let response = self
            .http_client
            .get(image_url)
            .send()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CoverError::NotFound(image_url.to_string()));
        }

        if !status.is_success() {
            return Err(CoverError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // Get content type
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?
            .to_vec();

        Ok(CoverImage {
            data,
            mime_type,
            url: image_url.to_string(),
        })
    }
}

impl Default for PageCoverClient {
    fn default() -> Self {
        Self::new()
    }
}
