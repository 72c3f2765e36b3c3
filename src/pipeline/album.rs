//! Album pipeline: every playlist item through the track pipeline, in order.
//!
//! Each item runs inside its own error boundary. A failing item is recorded
//! and the loop moves on; the summary at the end lists what failed.

use super::{Session, Track, TrackReport, run_track};
use crate::error::{Result, ResultExt};
use crate::locale::LanguageDictionary;
use crate::media::{PlaylistListing, music_variant};
use crate::text::sanitize_file_name;

/// An album item that did not make it through the pipeline
#[derive(Debug, Clone)]
pub struct AlbumItemFailure {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct AlbumReport {
    pub title: String,
    pub completed: Vec<TrackReport>,
    pub failed: Vec<AlbumItemFailure>,
}

impl AlbumReport {
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// Print the localized end-of-run summary
    pub fn print_summary(&self, dict: &LanguageDictionary) {
        println!();
        println!(
            "{}",
            dict.format("album_summary", &[&self.completed.len(), &self.total()])
        );
        for failure in &self.failed {
            println!(
                "{}",
                dict.format("album_failed_item", &[&failure.url, &failure.reason])
            );
        }
    }
}

/// Download every item of `listing` into a subdirectory named after it.
///
/// Only errors that affect the whole album (the directory cannot be created)
/// are returned; per-item errors end up in [`AlbumReport::failed`].
pub async fn run_album(session: &Session, listing: &PlaylistListing) -> Result<AlbumReport> {
    let album_dir = session
        .prefs
        .output_dir
        .join(sanitize_file_name(&listing.title));
    std::fs::create_dir_all(&album_dir)
        .with_context(format!("creating album directory {}", album_dir.display()))?;

    tracing::info!(
        "Album {:?}: {} items into {}",
        listing.title,
        listing.entries.len(),
        album_dir.display()
    );
    println!(
        "{}",
        session.dict.format("items_in_album", &[&listing.entries.len()])
    );

    let mut report = AlbumReport {
        title: listing.title.clone(),
        completed: Vec::with_capacity(listing.entries.len()),
        failed: Vec::new(),
    };

    for entry in &listing.entries {
        let url = music_variant(entry);
        let outcome = async {
            let identity = session.media.resolve_track(&url).await?;
            let track = Track::new(identity, &album_dir, &session.prefs.audio_format);
            run_track(session, &track).await
        }
        .await;

        match outcome {
            Ok(track_report) => report.completed.push(track_report),
            Err(e) => {
                tracing::error!("Album item {} failed: {}", url, e);
                println!("{}", session.dict.format("track_failed", &[&url, &e]));
                report.failed.push(AlbumItemFailure {
                    url,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
