use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{LanguageDictionary, LocaleError};

const BUNDLED_AVAILABLE: &str = include_str!("../../translations/available.json");

const BUNDLED_LANGUAGES: &[(&str, &str)] = &[
    ("EN", include_str!("../../translations/EN.json")),
    ("ES", include_str!("../../translations/ES.json")),
];

/// One entry of `available.json`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AvailableLanguage {
    pub language: String,
    pub countries: Vec<String>,
}

/// Where translation files are read from
#[derive(Debug, Clone)]
pub enum LanguageStore {
    /// Files compiled into the binary
    Bundled,
    /// `<dir>/<CODE>.json` and `<dir>/available.json` on disk
    Directory(PathBuf),
}

impl LanguageStore {
    pub fn bundled() -> Self {
        Self::Bundled
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// Load the dictionary for a language code (case-insensitive).
    pub fn load(&self, code: &str) -> Result<LanguageDictionary, LocaleError> {
        let code = code.to_ascii_uppercase();
        let contents = match self {
            Self::Bundled => BUNDLED_LANGUAGES
                .iter()
                .find(|(name, _)| *name == code)
                .map(|(_, json)| (*json).to_string())
                .ok_or_else(|| LocaleError::UnknownLanguage(code.clone()))?,
            Self::Directory(dir) => {
                let path = dir.join(format!("{code}.json"));
                if !path.is_file() {
                    return Err(LocaleError::UnknownLanguage(code));
                }
                read_file(&path)?
            }
        };

        let entries: HashMap<String, String> =
            serde_json::from_str(&contents).map_err(|e| LocaleError::Parse {
                name: code.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!("Loaded {} translation strings for {}", entries.len(), code);
        Ok(LanguageDictionary::new(code, entries))
    }

    /// Country → language table
    pub fn available(&self) -> Result<Vec<AvailableLanguage>, LocaleError> {
        let contents = match self {
            Self::Bundled => BUNDLED_AVAILABLE.to_string(),
            Self::Directory(dir) => read_file(&dir.join("available.json"))?,
        };
        serde_json::from_str(&contents).map_err(|e| LocaleError::Parse {
            name: "available.json".to_string(),
            message: e.to_string(),
        })
    }
}

fn read_file(path: &Path) -> Result<String, LocaleError> {
    std::fs::read_to_string(path).map_err(|e| LocaleError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_load_is_case_insensitive() {
        let dict = LanguageStore::bundled().load("en").unwrap();
        assert_eq!(dict.language(), "EN");
        assert_eq!(dict.get("table_id").unwrap(), "ID");
    }

    #[test]
    fn test_bundled_unknown_language() {
        let err = LanguageStore::bundled().load("ZZ").unwrap_err();
        assert!(matches!(err, LocaleError::UnknownLanguage(ref c) if c == "ZZ"));
    }

    #[test]
    fn test_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("FR.json"), r#"{"downloading": "Téléchargement {}"}"#).unwrap();
        std::fs::write(
            dir.path().join("available.json"),
            r#"[{"language": "FR", "countries": ["FR", "BE"]}]"#,
        )
        .unwrap();

        let store = LanguageStore::from_dir(dir.path());
        let dict = store.load("fr").unwrap();
        assert_eq!(dict.format("downloading", &[&"x"]), "Téléchargement x");

        let available = store.available().unwrap();
        assert_eq!(
            available,
            vec![AvailableLanguage {
                language: "FR".to_string(),
                countries: vec!["FR".to_string(), "BE".to_string()],
            }]
        );
        assert!(matches!(store.load("DE"), Err(LocaleError::UnknownLanguage(_))));
    }

    #[test]
    fn test_directory_store_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("EN.json"), "not json").unwrap();
        let err = LanguageStore::from_dir(dir.path()).load("EN").unwrap_err();
        assert!(matches!(err, LocaleError::Parse { .. }));
    }
}
