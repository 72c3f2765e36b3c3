//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\rytmdl\config.toml
//! - macOS: ~/Library/Application Support/rytmdl/config.toml
//! - Linux: ~/.config/rytmdl/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded at
//! startup, overridden by command-line flags, and written back only when
//! `--write-config` is given.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::locale::DEFAULT_LANGUAGE;
use crate::pipeline::Preferences;
use crate::text::expand_home;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Download settings
    pub download: DownloadConfig,

    /// Metadata search settings
    pub metadata: MetadataConfig,

    /// Interface language settings
    pub locale: LocaleConfig,

    /// External tool locations
    pub tools: ToolsConfig,
}

/// Download settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Where files are written (`~` is expanded)
    pub output_dir: PathBuf,

    /// Audio extension requested from the extractor
    pub audio_format: String,

    /// Keep the cover image next to the audio file
    pub keep_cover: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("~"),
            audio_format: "m4a".to_string(),
            keep_cover: false,
        }
    }
}

/// Metadata search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Never search or embed metadata
    pub skip: bool,

    /// Use the first search result without asking
    pub auto_select: bool,

    /// Country code for the catalog search
    pub country: String,

    /// Rows shown in the selection table
    pub search_max_display: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            skip: false,
            auto_select: false,
            country: "US".to_string(),
            search_max_display: 15,
        }
    }
}

/// Interface language settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Forced language code (empty = detect from the system locale)
    pub language: Option<String>,

    /// Used when detection fails
    pub default_language: String,

    /// Directory with `<CODE>.json` translations replacing the bundled ones
    pub translations_dir: Option<PathBuf>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            translations_dir: None,
        }
    }
}

/// External tool locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// yt-dlp executable (default: PATH and common install locations)
    pub yt_dlp_path: Option<PathBuf>,
}

impl Config {
    /// Pipeline preferences from the configured values
    pub fn preferences(&self) -> Preferences {
        Preferences {
            output_dir: expand_home(&self.download.output_dir),
            audio_format: self.download.audio_format.clone(),
            country: self.metadata.country.clone(),
            skip_metadata: self.metadata.skip,
            search_max_display: self.metadata.search_max_display,
            auto_select: self.metadata.auto_select,
            keep_cover: self.download.keep_cover,
            download_only: false,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rytmdl"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`]
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location, returning the path written
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[download]"));
        assert!(toml.contains("[metadata]"));
        assert!(toml.contains("[locale]"));
        assert!(toml.contains("[tools]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[metadata]
country = "ES"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.metadata.country, "ES");
        assert_eq!(config.metadata.search_max_display, 15);
        assert_eq!(config.download.audio_format, "m4a");
        assert_eq!(config.locale.default_language, "EN");
        assert!(config.tools.yt_dlp_path.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.download.output_dir = PathBuf::from("/music");
        config.metadata.auto_select = true;
        config.locale.language = Some("ES".to_string());

        save_to(&config, &path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[download\noutput_dir = ").unwrap();

        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_preferences_from_config() {
        let mut config = Config::default();
        config.metadata.skip = true;
        config.download.keep_cover = true;

        let prefs = config.preferences();
        assert!(prefs.skip_metadata);
        assert!(prefs.keep_cover);
        assert!(!prefs.download_only);
        assert_eq!(prefs.country, "US");
    }
}
