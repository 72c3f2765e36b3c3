//! Adapter layer: Convert iTunes DTOs to domain models
//!
//! This is the ONLY place where catalog DTO types are converted to domain types.

use chrono::{DateTime, Datelike, NaiveDate};

use super::domain::{CatalogError, MetadataCandidate};
use super::dto;

/// Convert a search response to candidates, failing when nothing usable came back
pub fn to_candidates(response: dto::SearchResponse) -> Result<Vec<MetadataCandidate>, CatalogError> {
    let candidates: Vec<MetadataCandidate> = response
        .results
        .into_iter()
        .filter(is_track)
        .map(to_candidate)
        .collect();

    if candidates.is_empty() {
        return Err(CatalogError::NoMatches);
    }
    Ok(candidates)
}

fn is_track(result: &dto::SearchResult) -> bool {
    result.wrapper_type.as_deref().is_none_or(|t| t == "track")
}

fn to_candidate(result: dto::SearchResult) -> MetadataCandidate {
    let year = result.release_date.as_deref().and_then(year_from_iso);
    MetadataCandidate {
        artist: result.artist_name,
        track: result.track_name,
        album: result.collection_name,
        release_date: result.release_date,
        year,
        genre: result.primary_genre_name,
    }
}

/// Year of an ISO 8601 date or timestamp ("2013-04-19T07:00:00Z", "2013-04-19")
pub fn year_from_iso(date: &str) -> Option<i32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.year());
    }
    let day = date.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
