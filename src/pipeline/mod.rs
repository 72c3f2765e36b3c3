//! Track and album orchestration.
//!
//! A [`Session`] bundles everything a run needs: the resolved language
//! dictionary, the user's preferences, and the four external seams (media
//! extractor, catalog, cover source, prompt). It is built once by the CLI
//! and passed by reference to every step.
//!
//! # Flow
//!
//! ```text
//! URL -> classify -> Track  -> download -> cover -> metadata
//!                 -> Album  -> for each item (isolated): Track flow
//!                 -> neither -> localized "wrong URL" message
//! ```

mod album;
mod track;

use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::CatalogApi;
use crate::cover::CoverSource;
use crate::error::Result;
use crate::locale::LanguageDictionary;
use crate::media::{self, MediaSource, SourceKind};
use crate::select::Prompt;

pub use album::{AlbumItemFailure, AlbumReport, run_album};
pub use track::{Track, TrackReport, TrackStage, run_track};

/// Per-run user preferences, merged from config and command-line flags
#[derive(Debug, Clone)]
pub struct Preferences {
    pub output_dir: PathBuf,
    /// Extension of the downloaded audio (`m4a`, `mp3`, ...)
    pub audio_format: String,
    /// ISO country code for the catalog search
    pub country: String,
    pub skip_metadata: bool,
    /// Maximum number of candidates shown in the selection table
    pub search_max_display: usize,
    pub auto_select: bool,
    pub keep_cover: bool,
    /// Stop after the download, no cover or metadata
    pub download_only: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            audio_format: "m4a".to_string(),
            country: "US".to_string(),
            skip_metadata: false,
            search_max_display: 15,
            auto_select: false,
            keep_cover: false,
            download_only: false,
        }
    }
}

/// Everything a download run needs
pub struct Session {
    pub dict: LanguageDictionary,
    pub prefs: Preferences,
    pub media: Arc<dyn MediaSource>,
    pub catalog: Arc<dyn CatalogApi>,
    pub covers: Arc<dyn CoverSource>,
    pub prompt: Arc<dyn Prompt>,
}

/// Classify `url` and run the matching orchestrator.
///
/// Unrecognized URLs are reported to the user and are not an error.
pub async fn process_url(session: &Session, url: &str) -> Result<()> {
    tracing::info!("Processing {}", url);

    match media::classify(session.media.as_ref(), url).await? {
        SourceKind::Track(identity) => {
            let track = Track::new(
                identity,
                &session.prefs.output_dir,
                &session.prefs.audio_format,
            );
            run_track(session, &track).await?;
        }
        SourceKind::Album(listing) => {
            let report = run_album(session, &listing).await?;
            report.print_summary(&session.dict);
        }
        SourceKind::Unrecognized => {
            tracing::warn!("Unrecognized URL: {}", url);
            println!("{}", session.dict.format("wrong_url", &[&url]));
        }
    }

    Ok(())
}
