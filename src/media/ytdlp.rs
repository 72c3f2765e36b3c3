//! [`MediaSource`] backed by the `yt-dlp` command-line tool
//!
//! Shelling out keeps extraction (signature deciphering, format selection,
//! site changes) in a tool that is updated far more often than we are.
//!
//! Install yt-dlp:
//! - Windows: `winget install yt-dlp`
//! - macOS: `brew install yt-dlp`
//! - Linux: `pipx install yt-dlp` or your distribution's package

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

use super::{MediaError, MediaIdentity, MediaSource, PlaylistListing, dto};

const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Common installation paths for yt-dlp on Windows
#[cfg(windows)]
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    r"C:\Program Files\yt-dlp\yt-dlp.exe",
    r"C:\ProgramData\chocolatey\bin\yt-dlp.exe",
];

#[cfg(not(windows))]
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    "/usr/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/opt/homebrew/bin/yt-dlp",
];

/// Find a working yt-dlp executable, checking common installation paths
fn find_ytdlp() -> Option<&'static str> {
    YTDLP_PATHS.iter().copied().find(|path| version_of(Path::new(path)).is_some())
}

fn version_of(program: &Path) -> Option<String> {
    std::process::Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

/// Base URL used for playlist entries that only carry a video id
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    /// Use the executable at `program`, or search the common locations when `None`.
    pub fn new(program: Option<PathBuf>) -> Self {
        let program = program.unwrap_or_else(|| {
            PathBuf::from(find_ytdlp().unwrap_or(DEFAULT_PROGRAM))
        });
        Self { program }
    }

    /// Version string reported by the executable (for diagnostics)
    pub fn version(&self) -> Option<String> {
        version_of(&self.program)
    }

    async fn run(&self, args: &[&str]) -> Result<Output, MediaError> {
        tracing::debug!("Running {} {}", self.program.display(), args.join(" "));
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))
    }

    fn spawn_error(&self, err: std::io::Error) -> MediaError {
        if err.kind() == ErrorKind::NotFound {
            MediaError::ToolMissing(format!(
                "{} was not found. Install it from https://github.com/yt-dlp/yt-dlp \
                 or set tools.yt_dlp_path in the config file",
                self.program.display()
            ))
        } else {
            MediaError::Extraction(format!("Failed to run {}: {}", self.program.display(), err))
        }
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl MediaSource for YtDlp {
    async fn resolve_track(&self, url: &str) -> Result<MediaIdentity, MediaError> {
        let output = self.run(&track_probe_args(url)).await?;

        if !output.status.success() {
            return Err(MediaError::SongUnavailable(stderr_summary(&output)));
        }

        let info = parse_info(&output.stdout)?;
        to_identity(url, info)
    }

    async fn resolve_album(&self, url: &str) -> Result<PlaylistListing, MediaError> {
        let output = self
            .run(&["-J", "--flat-playlist", "--no-warnings", url])
            .await?;

        if !output.status.success() {
            return Err(MediaError::NotAnAlbum(stderr_summary(&output)));
        }

        let info = parse_info(&output.stdout)?;
        to_listing(url, info)
    }

    async fn download_audio(
        &self,
        identity: &MediaIdentity,
        destination: &Path,
    ) -> Result<(), MediaError> {
        let args = download_args(destination, &identity.url);

        tracing::debug!("Downloading {} with {}", identity.url, args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(MediaError::Download(stderr_summary(&output)));
        }

        if !destination.is_file() {
            return Err(MediaError::Download(format!(
                "{} finished but {} was not created",
                self.program.display(),
                destination.display()
            )));
        }

        Ok(())
    }
}

/// Arguments for resolving a single item.
///
/// `--flat-playlist` keeps a playlist URL from extracting every member before
/// it is rejected as not being a single item.
fn track_probe_args(url: &str) -> [&str; 6] {
    [
        "-J",
        "--no-playlist",
        "--flat-playlist",
        "--skip-download",
        "--no-warnings",
        url,
    ]
}

/// Arguments for downloading `url` to `destination`.
///
/// `m4a` is picked straight from the served formats. Other extensions are
/// converted with `-x`, which needs an `%(ext)s` output template so the
/// intermediate file and the converted one do not collide.
fn download_args(destination: &Path, url: &str) -> Vec<String> {
    let ext = destination
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("m4a")
        .to_ascii_lowercase();
    // -o is an output template; literal percent signs must be doubled
    let escape = |path: &Path| path.to_string_lossy().replace('%', "%%");

    let mut args: Vec<String> = vec!["--no-playlist".into(), "--no-part".into()];
    if ext == "m4a" {
        args.extend([
            "-f".into(),
            "bestaudio[ext=m4a]".into(),
            "-o".into(),
            escape(destination),
        ]);
    } else {
        let stem = destination.with_extension("");
        args.extend([
            "-f".into(),
            "bestaudio".into(),
            "-x".into(),
            "--audio-format".into(),
            ext,
            "-o".into(),
            format!("{}.%(ext)s", escape(&stem)),
        ]);
    }
    args.push(url.to_string());
    args
}

/// Last non-empty stderr line, which is where yt-dlp puts `ERROR: ...`
fn stderr_summary(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("exit status {}", output.status))
}

fn parse_info(stdout: &[u8]) -> Result<dto::InfoDict, MediaError> {
    serde_json::from_slice(stdout).map_err(|e| MediaError::Parse(e.to_string()))
}

fn to_identity(url: &str, info: dto::InfoDict) -> Result<MediaIdentity, MediaError> {
    if info.is_playlist() {
        return Err(MediaError::SongUnavailable(format!("{url} is a playlist")));
    }

    let title = info
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MediaError::SongUnavailable(format!("{url} has no title")))?;

    let author = info.channel.or(info.uploader).unwrap_or_default();

    Ok(MediaIdentity {
        url: url.to_string(),
        title,
        author,
    })
}

fn to_listing(url: &str, info: dto::InfoDict) -> Result<PlaylistListing, MediaError> {
    if !info.is_playlist() {
        return Err(MediaError::NotAnAlbum(format!("{url} is a single item")));
    }

    let entries: Vec<String> = info
        .entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(entry_url)
        .collect();

    if let Some(count) = info.playlist_count
        && count as usize != entries.len()
    {
        tracing::warn!(
            "Playlist {} reports {} items but {} could be listed",
            url,
            count,
            entries.len()
        );
    }

    Ok(PlaylistListing {
        url: url.to_string(),
        title: info.title.unwrap_or_else(|| info.id.unwrap_or_default()),
        entries,
    })
}

fn entry_url(entry: dto::PlaylistEntry) -> Option<String> {
    match (entry.url, entry.id) {
        (Some(url), _) if url.contains("://") => Some(url),
        (_, Some(id)) => Some(format!("{WATCH_URL}{id}")),
        (Some(url), None) => Some(format!("{WATCH_URL}{url}")),
        (None, None) => None,
    }
}
