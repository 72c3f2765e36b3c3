//! iTunes Search API Data Transfer Objects
//!
//! These types match what the iTunes Search API returns for
//! `media=music&entity=song` searches.
//! DO NOT use these types outside the catalog module - convert to domain types.
//!
//! API Reference: https://performance-partners.apple.com/search-api

use serde::{Deserialize, Serialize};

/// Search response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Number of results in `results`
    pub result_count: u32,
    /// Results in relevance order
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A single search result. Non-track results omit most fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// "track", "collection", "artist"
    pub wrapper_type: Option<String>,
    /// "song", "music-video", ...
    pub kind: Option<String>,
    pub artist_name: Option<String>,
    pub track_name: Option<String>,
    pub collection_name: Option<String>,
    /// ISO 8601 timestamp, e.g. "2013-05-17T07:00:00Z"
    pub release_date: Option<String>,
    pub primary_genre_name: Option<String>,
    pub track_view_url: Option<String>,
    pub artwork_url100: Option<String>,
}
