//! Metadata catalog search.
//!
//! # Architecture
//!
//! Same layering as every external API client in this crate:
//! - **Domain model** (`domain.rs`) - [`MetadataCandidate`], what the rest of the app sees
//! - **API DTOs** (`dto.rs`) - Exact iTunes Search API response shapes
//! - **Adapter** (`adapter.rs`) - Converts DTOs to candidates
//! - **Client** (`client.rs`) - HTTP client
//!
//! Callers depend on the [`CatalogApi`] trait so tests can substitute a mock.

mod adapter;
mod client;
pub mod domain;
pub mod dto;

use async_trait::async_trait;

pub use client::ItunesClient;
pub use domain::{CatalogError, MetadataCandidate};

/// Trait for catalog searches.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search by (pre-cleaned) title and country code.
    ///
    /// Returns candidates in catalog ranking order, or
    /// [`CatalogError::NoMatches`] when nothing matched.
    async fn search(&self, term: &str, country: &str) -> Result<Vec<MetadataCandidate>, CatalogError>;
}

#[async_trait]
impl CatalogApi for ItunesClient {
    async fn search(&self, term: &str, country: &str) -> Result<Vec<MetadataCandidate>, CatalogError> {
        self.search(term, country).await
    }
}
