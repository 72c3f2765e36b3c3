//! Single-track pipeline: download, cover, metadata.

use std::path::{Path, PathBuf};

use super::Session;
use crate::catalog::CatalogError;
use crate::error::{Result, ResultExt};
use crate::media::{self, DownloadStatus, MediaIdentity};
use crate::select::{self, Selection};
use crate::tags::{self, TagFields};
use crate::text::{clean_query, remove_artifacts, sanitize_file_name};

/// A resolved item and where its files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub identity: MediaIdentity,
    /// `Author - Title` with known artifacts removed
    pub display_name: String,
    pub audio_path: PathBuf,
    /// Temporary cover image, removed after embedding unless kept
    pub cover_path: PathBuf,
}

impl Track {
    pub fn new(identity: MediaIdentity, output_dir: &Path, extension: &str) -> Self {
        let raw_name = if identity.author.is_empty() {
            identity.title.clone()
        } else {
            format!("{} - {}", identity.author, identity.title)
        };
        let display_name = remove_artifacts(&raw_name);
        let file_stem = sanitize_file_name(&display_name);

        Self {
            audio_path: output_dir.join(format!("{file_stem}.{extension}")),
            cover_path: output_dir.join(format!("{file_stem}.jpg")),
            display_name,
            identity,
        }
    }
}

/// Pipeline steps a track went through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStage {
    Resolved,
    Downloaded,
    CoverEmbedded,
    MetadataEmbedded,
    MetadataSkipped,
    Done,
}

#[derive(Debug, Clone)]
pub struct TrackReport {
    pub display_name: String,
    pub audio_path: PathBuf,
    pub download: DownloadStatus,
    pub stages: Vec<TrackStage>,
}

impl TrackReport {
    pub fn reached(&self, stage: TrackStage) -> bool {
        self.stages.contains(&stage)
    }
}

/// Drive one track through download, cover embedding and metadata embedding.
///
/// A missing cover or an empty catalog search only skips that step. Download,
/// network and save errors abort the track and are returned.
pub async fn run_track(session: &Session, track: &Track) -> Result<TrackReport> {
    let dict = &session.dict;
    let prefs = &session.prefs;
    let mut stages = vec![TrackStage::Resolved];

    if let Some(dir) = track.audio_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(format!("creating output directory {}", dir.display()))?;
    }

    if track.audio_path.is_file() {
        println!("{}", dict.format("download_skipped", &[&track.display_name]));
    } else {
        println!("{}", dict.format("downloading", &[&track.display_name]));
    }
    let download =
        media::download_audio_if_missing(session.media.as_ref(), &track.identity, &track.audio_path)
            .await?;
    stages.push(TrackStage::Downloaded);

    if prefs.download_only {
        stages.push(TrackStage::Done);
        return Ok(report(track, download, stages));
    }

    if embed_cover(session, track).await? {
        stages.push(TrackStage::CoverEmbedded);
    }

    stages.push(embed_metadata(session, track).await?);
    stages.push(TrackStage::Done);

    tracing::info!("Finished {}", track.display_name);
    Ok(report(track, download, stages))
}

fn report(track: &Track, download: DownloadStatus, stages: Vec<TrackStage>) -> TrackReport {
    TrackReport {
        display_name: track.display_name.clone(),
        audio_path: track.audio_path.clone(),
        download,
        stages,
    }
}

/// Returns whether a cover was embedded
async fn embed_cover(session: &Session, track: &Track) -> Result<bool> {
    let dict = &session.dict;

    let lookup = async {
        let image_url = session.covers.cover_url(&track.identity.url).await?;
        tracing::debug!("Cover for {}: {}", track.display_name, image_url);
        session.covers.fetch_image(&image_url).await
    };

    let image = match lookup.await {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!("No cover for {}: {}", track.display_name, e);
            println!("{}", dict.format("cover_not_found", &[&track.display_name]));
            return Ok(false);
        }
    };

    tokio::fs::write(&track.cover_path, &image.data)
        .await
        .with_context(format!("writing cover {}", track.cover_path.display()))?;

    let embedded = tags::embed_cover(&track.audio_path, image.data, &image.mime_type);

    let removed = if session.prefs.keep_cover {
        Ok(())
    } else {
        tokio::fs::remove_file(&track.cover_path)
            .await
            .with_context(format!("removing cover {}", track.cover_path.display()))
    };

    embedded?;
    removed?;
    println!("{}", dict.format("cover_embedded", &[&track.display_name]));
    Ok(true)
}

/// Returns `MetadataEmbedded` or `MetadataSkipped`
async fn embed_metadata(session: &Session, track: &Track) -> Result<TrackStage> {
    let dict = &session.dict;
    let prefs = &session.prefs;

    if prefs.skip_metadata {
        tracing::info!("Metadata skipped for {}", track.display_name);
        return Ok(TrackStage::MetadataSkipped);
    }

    let query = clean_query(&track.display_name);
    let candidates = match session.catalog.search(&query, &prefs.country).await {
        Ok(candidates) => candidates,
        Err(CatalogError::NoMatches) => {
            tracing::info!("No catalog matches for {:?} in {}", query, prefs.country);
            println!("{}", dict.t("cannot_embed_metadata"));
            return Ok(TrackStage::MetadataSkipped);
        }
        Err(e) => return Err(e.into()),
    };

    let selection = select::choose(
        &candidates,
        prefs.search_max_display,
        prefs.auto_select,
        dict,
        session.prompt.as_ref(),
    )?;

    let index = match selection {
        Selection::Skip => {
            println!("{}", dict.t("metadata_embedding_skipped"));
            return Ok(TrackStage::MetadataSkipped);
        }
        Selection::Index(index) => index,
    };

    let Some(candidate) = candidates.get(index) else {
        return Ok(TrackStage::MetadataSkipped);
    };

    let fields = TagFields::from_candidate(candidate, dict);
    tags::embed_metadata(&track.audio_path, &fields)?;
    tracing::info!("Embedded {:?} into {}", fields, track.audio_path.display());
    println!("{}", dict.format("metadata_embedded", &[&track.display_name]));

    Ok(TrackStage::MetadataEmbedded)
}
