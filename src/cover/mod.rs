//! Cover art lookup for media pages.
//!
//! The media site publishes its preview image in the page's `og:image`
//! meta descriptor. On the music host that image is the square album
//! cover, which is why album items are rewritten to that host first.
//!
//! Lookup failures are ordinary [`CoverError`] values; callers decide
//! whether a missing cover is fatal (it never is for the track pipeline).

mod client;
mod scrape;

use async_trait::async_trait;

pub use client::PageCoverClient;
pub use scrape::extract_og_image;

/// Downloaded cover image
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// Image data (JPEG, PNG or WebP)
    pub data: Vec<u8>,
    /// MIME type from the response headers
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

/// Errors that can occur while looking up or downloading a cover
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoverError {
    #[error("Cover URL not found on {0}")]
    NotFound(String),

    #[error("Failed to retrieve page {url}: HTTP {status}")]
    PageUnavailable { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(String),
}

/// Trait for cover lookups.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CoverSource: Send + Sync {
    /// Find the cover image URL advertised by a media page.
    async fn cover_url(&self, page_url: &str) -> Result<String, CoverError>;

    /// Download an image.
    async fn fetch_image(&self, image_url: &str) -> Result<CoverImage, CoverError>;
}

#[async_trait]
impl CoverSource for PageCoverClient {
    async fn cover_url(&self, page_url: &str) -> Result<String, CoverError> {
        self.cover_url(page_url).await
    }

    async fn fetch_image(&self, image_url: &str) -> Result<CoverImage, CoverError> {
        self.fetch_image(image_url).await
    }
}
