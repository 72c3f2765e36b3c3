//! Tag and cover embedding for downloaded audio files.
//!
//! Uses the lofty crate for format-independent metadata access, so the
//! same code writes MP4 atoms (M4A), ID3v2 (MP3/WAV) and Vorbis comments
//! (Opus/OGG), whichever audio format was downloaded.
//!
//! # Features
//! - Replace the embedded cover image
//! - Write artist, title, year, album and genre from a catalog candidate
//! - Placeholder substitution for missing candidate fields

use lofty::config::WriteOptions;
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};

use crate::catalog::MetadataCandidate;
use crate::locale::LanguageDictionary;

/// The five text fields written from a catalog candidate, placeholders
/// already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFields {
    pub artist: String,
    pub title: String,
    /// Release year, or the localized "unknown year" placeholder
    pub year: String,
    pub album: String,
    pub genre: String,
}

impl TagFields {
    /// Build fields from a candidate, substituting a localized placeholder
    /// for every missing value. The selection table uses the same values.
    pub fn from_candidate(candidate: &MetadataCandidate, dict: &LanguageDictionary) -> Self {
        let or_placeholder = |value: &Option<String>, key: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| dict.t(key).to_string())
        };

        Self {
            artist: or_placeholder(&candidate.artist, "unknown_artist"),
            title: or_placeholder(&candidate.track, "unknown_track"),
            year: candidate
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| dict.t("unknown_year").to_string()),
            album: or_placeholder(&candidate.album, "unknown_album"),
            genre: or_placeholder(&candidate.genre, "unknown_genre"),
        }
    }

    /// Numeric year, when the year field is not a placeholder
    pub fn year_number(&self) -> Option<u32> {
        self.year.parse().ok()
    }
}

/// Tag values read back from a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedTags {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub picture_count: usize,
}

/// Errors from reading or saving tags
#[derive(Debug, Clone, thiserror::Error)]
pub enum TagError {
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Error saving metadata to {}: {message}", path.display())]
    Save { path: PathBuf, message: String },
}

impl TagError {
    fn read(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn save(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Save {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

fn open(path: &Path) -> Result<TaggedFile, TagError> {
    Probe::open(path)
        .map_err(|e| TagError::read(path, e))?
        .read()
        .map_err(|e| TagError::read(path, e))
}

/// Primary tag of the file, created empty when the file has none yet
fn primary_tag_mut<'a>(tagged_file: &'a mut TaggedFile, path: &Path) -> Result<&'a mut Tag, TagError> {
    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| TagError::read(path, format!("no {tag_type:?} tag available")))
}

fn save(tag: &Tag, path: &Path) -> Result<(), TagError> {
    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::save(path, e))
}

/// Map a Content-Type header value to a lofty MIME type
pub fn mime_type_from_str(content_type: &str) -> MimeType {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/gif" => MimeType::Gif,
        "image/bmp" => MimeType::Bmp,
        "image/tiff" => MimeType::Tiff,
        _ => MimeType::Unknown(essence),
    }
}

/// Replace the file's embedded artwork with `data`.
pub fn embed_cover(path: &Path, data: Vec<u8>, mime_type: &str) -> Result<(), TagError> {
    let mut tagged_file = open(path)?;
    let tag = primary_tag_mut(&mut tagged_file, path)?;

    for index in (0..tag.pictures().len()).rev() {
        tag.remove_picture(index);
    }
    tag.push_picture(Picture::new_unchecked(
        PictureType::CoverFront,
        Some(mime_type_from_str(mime_type)),
        None,
        data,
    ));

    save(tag, path)
}

/// Write the five metadata fields into the file.
///
/// Any failure while saving is reported as [`TagError::Save`], whatever
/// field or format caused it.
pub fn embed_metadata(path: &Path, fields: &TagFields) -> Result<(), TagError> {
    let mut tagged_file = open(path)?;
    let tag = primary_tag_mut(&mut tagged_file, path)?;

    tag.set_artist(fields.artist.clone());
    tag.set_title(fields.title.clone());
    tag.set_album(fields.album.clone());
    tag.set_genre(fields.genre.clone());

    match fields.year_number() {
        Some(year) => tag.set_year(year),
        None => {
            tag.remove_year();
            // Only MP4 stores the date as free text; other formats expect a timestamp
            if tag.tag_type() == TagType::Mp4Ilst {
                tag.insert_text(ItemKey::RecordingDate, fields.year.clone());
            }
        }
    }

    save(tag, path)
}

/// Read the tag values this module writes
pub fn read_embedded(path: &Path) -> Result<EmbeddedTags, TagError> {
    let tagged_file = open(path)?;
    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok(EmbeddedTags::default());
    };

    Ok(EmbeddedTags {
        artist: tag.artist().map(|s| s.to_string()),
        title: tag.title().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        genre: tag.genre().map(|s| s.to_string()),
        year: tag.year(),
        picture_count: tag.pictures().len(),
    })
}
