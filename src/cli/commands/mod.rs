//! CLI argument definitions and dispatch.
//!
//! Help and version output is localized, so clap's built-in `--help` and
//! `--version` are disabled and handled here instead:
//! - `info`: help, version and `--write-config`
//! - `download`: the URL loop

mod download;
mod info;

use clap::Parser;
use std::path::PathBuf;

use crate::catalog::ItunesClient;
use crate::config::{self, Config};
use crate::cover::PageCoverClient;
use crate::locale::{self, DEFAULT_LANGUAGE, LanguageDictionary, LanguageStore};
use crate::media::{self, AUDIO_FORMATS, YtDlp};
use crate::pipeline::Session;
use crate::select::StdinPrompt;
use crate::text::expand_home;

pub use download::cmd_download;
pub use info::{cmd_help, cmd_version, cmd_write_config};

/// rytmdl CLI
#[derive(Parser, Debug, Default)]
#[command(name = "rytmdl", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Song, video, album or playlist URLs
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Show the help message
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Show version information
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Do not search for or embed metadata
    #[arg(short, long)]
    pub skip_metadata: bool,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Interface language code (EN, ES)
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Always use the first metadata result
    #[arg(short, long)]
    pub auto_select: bool,

    /// Country code for the metadata search
    #[arg(short, long, value_name = "CODE")]
    pub country: Option<String>,

    /// Maximum number of metadata results shown
    #[arg(short = 'n', long, value_name = "N")]
    pub max_results: Option<usize>,

    /// Audio format to download (m4a, mp3, ogg, opus, flac, wav)
    #[arg(short, long, value_name = "EXT")]
    pub format: Option<String>,

    /// Keep the downloaded cover image next to the audio file
    #[arg(long)]
    pub keep_cover: bool,

    /// Only download audio, skip cover and metadata
    #[arg(long)]
    pub download_only: bool,

    /// Path to the yt-dlp executable
    #[arg(long, env = "RYTMDL_YT_DLP", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,

    /// Save the effective settings as the new defaults
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    /// Copy every flag that was given into `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.download.output_dir = output.clone();
        }
        if let Some(format) = &self.format {
            config.download.audio_format = format.trim_start_matches('.').to_string();
        }
        if self.keep_cover {
            config.download.keep_cover = true;
        }
        if self.skip_metadata {
            config.metadata.skip = true;
        }
        if self.auto_select {
            config.metadata.auto_select = true;
        }
        if let Some(country) = &self.country {
            config.metadata.country = country.to_uppercase();
        }
        if let Some(max) = self.max_results {
            config.metadata.search_max_display = max.max(1);
        }
        if let Some(language) = &self.language {
            config.locale.language = Some(language.clone());
        }
        if let Some(path) = &self.yt_dlp {
            config.tools.yt_dlp_path = Some(path.clone());
        }
    }
}

/// Pick the interface language; the bundled default is the last resort.
fn load_dictionary(config: &Config) -> anyhow::Result<LanguageDictionary> {
    let store = match &config.locale.translations_dir {
        Some(dir) => LanguageStore::from_dir(expand_home(dir)),
        None => LanguageStore::bundled(),
    };

    match locale::resolve_dictionary(
        &store,
        config.locale.language.as_deref(),
        &config.locale.default_language,
    ) {
        Ok(dict) => Ok(dict),
        Err(e) => {
            tracing::warn!("Falling back to bundled {}: {}", DEFAULT_LANGUAGE, e);
            Ok(LanguageStore::bundled().load(DEFAULT_LANGUAGE)?)
        }
    }
}

/// Localized rejection for an audio format the tagger cannot write
fn unsupported_format(config: &Config, dict: &LanguageDictionary) -> Option<String> {
    let format = &config.download.audio_format;
    if media::is_supported_format(format) {
        return None;
    }
    Some(dict.format("unsupported_format", &[format, &AUDIO_FORMATS.join(", ")]))
}

/// Run the CLI with the parsed arguments.
///
/// Per-URL failures are printed and logged; they do not make this fail.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = config::load();
    cli.apply_to(&mut config);

    let dict = load_dictionary(&config)?;
    tracing::debug!("Using language {}", dict.language());

    let nothing_requested = cli.urls.is_empty() && !cli.version && !cli.write_config;
    if cli.help || nothing_requested {
        cmd_help(&dict);
    }
    if cli.version {
        cmd_version(&dict);
    }
    if let Some(message) = unsupported_format(&config, &dict) {
        tracing::error!("Unsupported audio format {:?}", config.download.audio_format);
        eprintln!("{message}");
        return Ok(());
    }
    if cli.write_config {
        cmd_write_config(&config, &dict);
    }
    if cli.urls.is_empty() {
        return Ok(());
    }

    let mut prefs = config.preferences();
    prefs.download_only = cli.download_only;

    let ytdlp = YtDlp::new(config.tools.yt_dlp_path.as_deref().map(expand_home));
    match ytdlp.version() {
        Some(version) => tracing::info!("Using yt-dlp {}", version),
        None => tracing::warn!("yt-dlp did not report a version, downloads will likely fail"),
    }

    let session = Session {
        dict,
        prefs,
        media: std::sync::Arc::new(ytdlp),
        catalog: std::sync::Arc::new(ItunesClient::new()),
        covers: std::sync::Arc::new(PageCoverClient::new()),
        prompt: std::sync::Arc::new(StdinPrompt),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(cmd_download(&session, &cli.urls));

    Ok(())
}
