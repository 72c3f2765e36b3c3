//! Media resolution and audio download.
//!
//! Turning a page URL into a stream is delegated to an external extractor
//! (`yt-dlp`). This module owns the domain types, the [`MediaSource`] seam
//! that orchestration code depends on, and the small amount of logic that
//! sits on top of it:
//!
//! - [`classify`] decides once whether a URL is a track, an album or neither
//! - [`music_variant`] rewrites a watch URL to the host that serves square covers
//! - [`download_audio_if_missing`] skips downloads whose target already exists
//! - [`is_supported_format`] limits downloads to containers the tagger can write

pub mod dto;
mod ytdlp;

use async_trait::async_trait;
use std::path::Path;

pub use ytdlp::YtDlp;

/// Audio formats that can be downloaded and tagged.
///
/// `m4a` is served natively; the others are extracted with ffmpeg by yt-dlp.
pub const AUDIO_FORMATS: &[&str] = &["m4a", "mp3", "ogg", "opus", "flac", "wav"];

/// Whether `ext` (case-insensitive, without the dot) is in [`AUDIO_FORMATS`]
pub fn is_supported_format(ext: &str) -> bool {
    AUDIO_FORMATS.iter().any(|f| f.eq_ignore_ascii_case(ext))
}

/// A single resolved media item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaIdentity {
    /// URL the item was resolved from
    pub url: String,
    /// Item title as published
    pub title: String,
    /// Channel / uploader name
    pub author: String,
}

/// A resolved playlist with its member URLs in playlist order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistListing {
    pub url: String,
    pub title: String,
    pub entries: Vec<String>,
}

/// What a user-supplied URL turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Track(MediaIdentity),
    Album(PlaylistListing),
    Unrecognized,
}

/// Outcome of [`download_audio_if_missing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded,
    AlreadyPresent,
}

/// Errors from resolving or downloading media
#[derive(Debug, Clone, thiserror::Error)]
pub enum MediaError {
    #[error("Not a single song or video: {0}")]
    SongUnavailable(String),

    #[error("Not an album or playlist: {0}")]
    NotAnAlbum(String),

    #[error("{0}")]
    ToolMissing(String),

    #[error("Extractor failed: {0}")]
    Extraction(String),

    #[error("Failed to parse extractor output: {0}")]
    Parse(String),

    #[error("Download failed: {0}")]
    Download(String),
}

/// Resolver and downloader for a media-hosting site.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Resolve a URL to a single item, or fail with `SongUnavailable`.
    async fn resolve_track(&self, url: &str) -> Result<MediaIdentity, MediaError>;

    /// Resolve a URL to a playlist listing, or fail with `NotAnAlbum`.
    async fn resolve_album(&self, url: &str) -> Result<PlaylistListing, MediaError>;

    /// Stream the best audio-only representation to `destination`.
    async fn download_audio(
        &self,
        identity: &MediaIdentity,
        destination: &Path,
    ) -> Result<(), MediaError>;
}

/// Decide what a URL points at, trying a single item first.
///
/// Only the "wrong shape" errors fall through to the next attempt; anything
/// else (missing extractor, parse failures) is returned to the caller.
pub async fn classify(source: &dyn MediaSource, url: &str) -> Result<SourceKind, MediaError> {
    match source.resolve_track(url).await {
        Ok(identity) => return Ok(SourceKind::Track(identity)),
        Err(MediaError::SongUnavailable(reason)) => {
            tracing::debug!("{} is not a single item: {}", url, reason);
        }
        Err(e) => return Err(e),
    }

    match source.resolve_album(url).await {
        Ok(listing) => Ok(SourceKind::Album(listing)),
        Err(MediaError::NotAnAlbum(reason)) => {
            tracing::info!("Unrecognized URL {}: {}", url, reason);
            Ok(SourceKind::Unrecognized)
        }
        Err(e) => Err(e),
    }
}

/// Rewrite `www.` in the host to `music.`, which serves square cover images.
///
/// Only the host is touched and only once; URLs without a `www.` host are
/// returned unchanged.
pub fn music_variant(url: &str) -> String {
    let (scheme, rest) = match url.find("://") {
        Some(pos) => url.split_at(pos + 3),
        None => ("", url),
    };

    match rest.strip_prefix("www.") {
        Some(after_host_prefix) => format!("{scheme}music.{after_host_prefix}"),
        None => url.to_string(),
    }
}

/// Download `identity` to `destination` unless a file is already there.
pub async fn download_audio_if_missing(
    source: &dyn MediaSource,
    identity: &MediaIdentity,
    destination: &Path,
) -> Result<DownloadStatus, MediaError> {
    if destination.is_file() {
        tracing::info!(
            "The download was skipped because a file with the same name already exists: {}",
            destination.display()
        );
        return Ok(DownloadStatus::AlreadyPresent);
    }

    source.download_audio(identity, destination).await?;
    tracing::info!("Downloaded {} to {}", identity.url, destination.display());
    Ok(DownloadStatus::Downloaded)
}
