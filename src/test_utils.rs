//! Test utilities and fixtures for rytmdl tests.
//!
//! Provides an audio fixture that lofty can tag, plus mock implementations
//! of every external seam so the pipeline can run without the network or
//! the extractor binary.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::mocks::{MockMedia, MockCatalog, MockCovers, ScriptedPrompt};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let media = MockMedia::new().with_track("https://t/1", "Artist", "Song");
//!     let session = test_session(dir.path(), Arc::new(media), ...);
//!     // ... test logic
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::catalog::MetadataCandidate;
use crate::locale::LanguageStore;
use crate::pipeline::{Preferences, Session};
use mocks::{MockCatalog, MockCovers, MockMedia, ScriptedPrompt};

/// Write a short silent PCM WAV file to `path`.
///
/// WAV is used because lofty reads and writes its ID3v2 chunk without any
/// external encoder, and the file is only a few kilobytes.
pub fn write_test_wav(path: &Path) {
    const SAMPLE_RATE: u32 = 8000;
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    const DATA_LEN: u32 = 1600;

    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);

    let mut bytes = Vec::with_capacity(44 + DATA_LEN as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + DATA_LEN).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&CHANNELS.to_le_bytes());
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&DATA_LEN.to_le_bytes());
    bytes.resize(44 + DATA_LEN as usize, 0);

    std::fs::write(path, bytes).expect("Failed to write test WAV");
}

/// A catalog candidate with every field populated.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let custom = MetadataCandidate {
///     album: None,
///     ..mock_candidate()
/// };
/// ```
pub fn mock_candidate() -> MetadataCandidate {
    MetadataCandidate {
        artist: Some("Test Artist".to_string()),
        track: Some("Test Track".to_string()),
        album: Some("Test Album".to_string()),
        release_date: Some("2021-06-04T07:00:00Z".to_string()),
        year: Some(2021),
        genre: Some("Electronic".to_string()),
    }
}

/// Session over mock seams, writing WAV files into `dir`.
///
/// Mocks are passed as `Arc`s so the test can keep a handle and inspect
/// recorded calls afterwards.
pub fn test_session(
    dir: &Path,
    media: Arc<MockMedia>,
    catalog: Arc<MockCatalog>,
    covers: MockCovers,
    prompt: Arc<ScriptedPrompt>,
) -> Session {
    Session {
        dict: LanguageStore::bundled()
            .load("EN")
            .expect("bundled English dictionary"),
        prefs: Preferences {
            output_dir: dir.to_path_buf(),
            audio_format: "wav".to_string(),
            ..Default::default()
        },
        media,
        catalog,
        covers: Arc::new(covers),
        prompt,
    }
}

pub mod mocks {
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::io;
    use std::path::Path;
    use std::sync::Mutex;

    use super::write_test_wav;
    use crate::catalog::{CatalogApi, CatalogError, MetadataCandidate};
    use crate::cover::{CoverError, CoverImage, CoverSource};
    use crate::media::{MediaError, MediaIdentity, MediaSource, PlaylistListing};
    use crate::select::Prompt;

    /// Mock extractor with a fixed table of tracks and albums.
    ///
    /// Unknown URLs fail with the "wrong shape" errors, so [`crate::media::classify`]
    /// treats them as unrecognized. Downloads write a WAV fixture.
    #[derive(Default)]
    pub struct MockMedia {
        tracks: HashMap<String, MediaIdentity>,
        albums: HashMap<String, PlaylistListing>,
        track_error: Option<MediaError>,
        track_calls: Mutex<Vec<String>>,
        album_calls: Mutex<Vec<String>>,
        downloads: Mutex<usize>,
    }

    impl MockMedia {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_track(mut self, url: &str, author: &str, title: &str) -> Self {
            self.tracks.insert(
                url.to_string(),
                MediaIdentity {
                    url: url.to_string(),
                    title: title.to_string(),
                    author: author.to_string(),
                },
            );
            self
        }

        pub fn with_album(mut self, url: &str, title: &str, entries: &[&str]) -> Self {
            self.albums.insert(
                url.to_string(),
                PlaylistListing {
                    url: url.to_string(),
                    title: title.to_string(),
                    entries: entries.iter().map(|e| e.to_string()).collect(),
                },
            );
            self
        }

        /// Fail every track resolution with `error` (takes precedence over tracks).
        pub fn with_track_error(mut self, error: MediaError) -> Self {
            self.track_error = Some(error);
            self
        }

        pub fn track_calls(&self) -> Vec<String> {
            self.track_calls.lock().unwrap().clone()
        }

        pub fn album_calls(&self) -> Vec<String> {
            self.album_calls.lock().unwrap().clone()
        }

        pub fn download_count(&self) -> usize {
            *self.downloads.lock().unwrap()
        }
    }

    #[async_trait]
    impl MediaSource for MockMedia {
        async fn resolve_track(&self, url: &str) -> Result<MediaIdentity, MediaError> {
            self.track_calls.lock().unwrap().push(url.to_string());
            if let Some(ref err) = self.track_error {
                return Err(err.clone());
            }
            self.tracks
                .get(url)
                .cloned()
                .ok_or_else(|| MediaError::SongUnavailable(url.to_string()))
        }

        async fn resolve_album(&self, url: &str) -> Result<PlaylistListing, MediaError> {
            self.album_calls.lock().unwrap().push(url.to_string());
            self.albums
                .get(url)
                .cloned()
                .ok_or_else(|| MediaError::NotAnAlbum(url.to_string()))
        }

        async fn download_audio(
            &self,
            _identity: &MediaIdentity,
            destination: &Path,
        ) -> Result<(), MediaError> {
            write_test_wav(destination);
            *self.downloads.lock().unwrap() += 1;
            Ok(())
        }
    }

    /// Mock catalog that returns predefined candidates.
    pub struct MockCatalog {
        /// Results to return from search
        pub results: Vec<MetadataCandidate>,
        /// Error to return (takes precedence over results)
        pub error: Option<CatalogError>,
        searches: Mutex<Vec<(String, String)>>,
    }

    impl MockCatalog {
        pub fn with_results(results: Vec<MetadataCandidate>) -> Self {
            Self {
                results,
                error: None,
                searches: Mutex::new(Vec::new()),
            }
        }

        pub fn no_matches() -> Self {
            Self::with_error(CatalogError::NoMatches)
        }

        pub fn with_error(error: CatalogError) -> Self {
            Self {
                results: vec![],
                error: Some(error),
                searches: Mutex::new(Vec::new()),
            }
        }

        /// `(term, country)` of every search so far
        pub fn searches(&self) -> Vec<(String, String)> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogApi for MockCatalog {
        async fn search(
            &self,
            term: &str,
            country: &str,
        ) -> Result<Vec<MetadataCandidate>, CatalogError> {
            self.searches
                .lock()
                .unwrap()
                .push((term.to_string(), country.to_string()));
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.results.clone())
        }
    }

    /// Mock cover source
    pub struct MockCovers {
        pub image: Option<CoverImage>,
        pub error: Option<CoverError>,
    }

    impl MockCovers {
        /// Every page advertises a JPEG cover
        pub fn found() -> Self {
            Self {
                image: Some(CoverImage {
                    data: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'],
                    mime_type: "image/jpeg".to_string(),
                    url: "https://i.mock/cover.jpg".to_string(),
                }),
                error: None,
            }
        }

        pub fn with_error(error: CoverError) -> Self {
            Self {
                image: None,
                error: Some(error),
            }
        }
    }

    #[async_trait]
    impl CoverSource for MockCovers {
        async fn cover_url(&self, page_url: &str) -> Result<String, CoverError> {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            self.image
                .as_ref()
                .map(|image| image.url.clone())
                .ok_or_else(|| CoverError::NotFound(page_url.to_string()))
        }

        async fn fetch_image(&self, image_url: &str) -> Result<CoverImage, CoverError> {
            self.image
                .clone()
                .ok_or_else(|| CoverError::NotFound(image_url.to_string()))
        }
    }

    /// Prompt that replays canned answers in order
    pub struct ScriptedPrompt {
        answers: Mutex<VecDeque<String>>,
        asked: Mutex<usize>,
    }

    impl ScriptedPrompt {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
                asked: Mutex::new(0),
            }
        }

        /// How many times the prompt was shown
        pub fn asked(&self) -> usize {
            *self.asked.lock().unwrap()
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(&self, _message: &str) -> io::Result<String> {
            *self.asked.lock().unwrap() += 1;
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::file::TaggedFileExt;

    #[test]
    fn test_write_test_wav_is_readable_by_lofty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.wav");
        write_test_wav(&path);

        let tagged = lofty::read_from_path(&path).expect("fixture should parse");
        assert_eq!(tagged.file_type(), lofty::file::FileType::Wav);
    }

    #[test]
    fn test_mock_candidate_defaults() {
        let candidate = mock_candidate();
        assert_eq!(candidate.artist.as_deref(), Some("Test Artist"));
        assert_eq!(candidate.year, Some(2021));
    }
}
