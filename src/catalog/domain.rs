//! Internal domain model for catalog search results.
//!
//! These types are OUR types - they don't change when the catalog API changes.

/// One catalog search result. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataCandidate {
    /// Artist name
    pub artist: Option<String>,
    /// Track name
    pub track: Option<String>,
    /// Album / collection name
    pub album: Option<String>,
    /// Release date as returned by the catalog (ISO 8601)
    pub release_date: Option<String>,
    /// Year extracted from the release date
    pub year: Option<i32>,
    /// Primary genre
    pub genre: Option<String>,
}

/// Errors that can occur while searching the catalog
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matches found")]
    NoMatches,

    #[error("Rate limited - try again later")]
    RateLimited,
}
