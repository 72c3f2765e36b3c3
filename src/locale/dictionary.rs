use std::collections::HashMap;

use super::LocaleError;

/// Every key the application looks up. Each shipped language must define
/// all of them.
pub const REQUIRED_KEYS: &[&str] = &[
    "app_description",
    "help_message",
    "version_text",
    "wrong_url",
    "items_in_album",
    "downloading",
    "download_skipped",
    "cover_embedded",
    "cover_not_found",
    "metadata_table_name",
    "table_id",
    "table_artist_name",
    "table_track_name",
    "table_release_year",
    "table_album",
    "table_genre",
    "select_metadata_prompt",
    "selection_clamped",
    "metadata_embedded",
    "metadata_embedding_skipped",
    "cannot_embed_metadata",
    "track_failed",
    "album_summary",
    "album_failed_item",
    "config_saved",
    "unsupported_format",
    "unknown_artist",
    "unknown_track",
    "unknown_year",
    "unknown_album",
    "unknown_genre",
];

/// Translated strings for one language. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct LanguageDictionary {
    language: String,
    entries: HashMap<String, String>,
}

impl LanguageDictionary {
    pub fn new(language: impl Into<String>, entries: HashMap<String, String>) -> Self {
        Self {
            language: language.into(),
            entries,
        }
    }

    /// Upper-case language code this dictionary was loaded for
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn get(&self, key: &str) -> Result<&str, LocaleError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LocaleError::MissingKey(key.to_string()))
    }

    /// Look up a key, falling back to the key itself when it is missing.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        match self.get(key) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("[{}] {}", self.language, e);
                key
            }
        }
    }

    /// Look up a key and substitute each `{}` with the next argument.
    pub fn format(&self, key: &str, args: &[&dyn std::fmt::Display]) -> String {
        let template = self.t(key);
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template;

        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }

    /// Keys from [`REQUIRED_KEYS`] this dictionary does not define
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.entries.contains_key(*key))
            .collect()
    }
}
