//! yt-dlp JSON output (`-J` / `--dump-single-json`)
//!
//! These types match the subset of the info dict we read. yt-dlp emits many
//! more fields; unknown ones are ignored by serde.
//! DO NOT use these types outside the media module - convert to domain types.

use serde::Deserialize;

/// Top-level info dict for a video or a playlist
#[derive(Debug, Clone, Deserialize)]
pub struct InfoDict {
    /// "video", "playlist", "url"... absent for plain videos on older versions
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    /// Channel display name
    pub channel: Option<String>,
    /// Uploader name (older extractors only fill this one)
    pub uploader: Option<String>,
    pub webpage_url: Option<String>,
    /// Playlist members (only present for playlists)
    pub entries: Option<Vec<PlaylistEntry>>,
    /// Number of playlist members reported by the site
    pub playlist_count: Option<u64>,
}

/// A playlist member as returned by `--flat-playlist`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

impl InfoDict {
    pub fn is_playlist(&self) -> bool {
        self.kind.as_deref() == Some("playlist") || self.entries.is_some()
    }
}
