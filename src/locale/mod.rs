//! Interface language selection and translated strings.
//!
//! Translations are key → string maps stored as JSON, one file per language
//! code (`EN.json`, `ES.json`, ...), plus `available.json` which maps
//! country codes to the language shipped for them. The files in
//! `translations/` are compiled into the binary; a directory override can be
//! configured to load edited or additional translations from disk.
//!
//! Resolution order for the dictionary used by a run:
//! 1. Explicit language override (ignored if it has no translation)
//! 2. Region of the OS locale, mapped through `available.json`
//! 3. The default language (`EN`)

mod dictionary;
mod store;

pub use dictionary::{LanguageDictionary, REQUIRED_KEYS};
pub use store::{AvailableLanguage, LanguageStore};

/// Language used when nothing else resolves.
pub const DEFAULT_LANGUAGE: &str = "EN";

/// Errors that can occur while resolving or loading translations
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocaleError {
    #[error("The current locale does not have a translation. Locale: {0}")]
    LanguageNotFound(String),

    #[error("No translation file for language {0}")]
    UnknownLanguage(String),

    #[error("Could not determine the system locale")]
    NoSystemLocale,

    #[error("Failed to read translation {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse translation {name}: {message}")]
    Parse { name: String, message: String },

    #[error("Translation key missing: {0}")]
    MissingKey(String),
}

/// Extract the upper-cased region from a POSIX or BCP 47 locale string.
///
/// `"es_ES.UTF-8"` → `"ES"`, `"en_GB@euro"` → `"GB"`, `"zh-Hans-CN"` → `"CN"`.
/// Locales without a region part (`"C"`, `"POSIX"`, `"en"`) yield `None`.
pub fn region_from_locale_string(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?;
    let (_, subtags) = base.split_once(['_', '-'])?;
    let region = subtags.rsplit(['_', '-']).next()?;
    let is_region = (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
        || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
    is_region.then(|| region.to_ascii_uppercase())
}

/// Region of the current OS locale.
///
/// The usual environment variables win; on Windows, where they are normally
/// unset, the user default locale name is read from the system.
pub fn system_region() -> Result<String, LocaleError> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| region_from_locale_string(&value))
        .or_else(os_locale_region)
        .ok_or(LocaleError::NoSystemLocale)
}

#[cfg(windows)]
fn os_locale_region() -> Option<String> {
    use windows_sys::Win32::Globalization::GetUserDefaultLocaleName;

    const LOCALE_NAME_MAX_LENGTH: usize = 85;
    let mut buffer = [0u16; LOCALE_NAME_MAX_LENGTH];
    // SAFETY: the length passed is the buffer's length in UTF-16 units
    let written = unsafe { GetUserDefaultLocaleName(buffer.as_mut_ptr(), buffer.len() as i32) };
    if written <= 1 {
        return None;
    }

    // `written` includes the terminating NUL
    let name = String::from_utf16_lossy(&buffer[..written as usize - 1]);
    tracing::debug!("Windows user locale: {}", name);
    region_from_locale_string(&name)
}

#[cfg(not(windows))]
fn os_locale_region() -> Option<String> {
    None
}

/// Map a region code to the language shipped for it.
pub fn get_language_from_locale(store: &LanguageStore, region: &str) -> Result<String, LocaleError> {
    let region = region.to_ascii_uppercase();
    store
        .available()?
        .into_iter()
        .find(|entry| entry.countries.iter().any(|c| c.eq_ignore_ascii_case(&region)))
        .map(|entry| entry.language)
        .ok_or(LocaleError::LanguageNotFound(region))
}

/// Pick and load the dictionary for this run.
///
/// Never fails as long as the default language loads; every fallback is logged.
pub fn resolve_dictionary(
    store: &LanguageStore,
    language_override: Option<&str>,
    default_language: &str,
) -> Result<LanguageDictionary, LocaleError> {
    if let Some(code) = language_override {
        match store.load(code) {
            Ok(dict) => return Ok(dict),
            Err(e) => tracing::warn!("Ignoring language override {}: {}", code, e),
        }
    }

    let from_locale = system_region().and_then(|region| get_language_from_locale(store, &region));
    match from_locale {
        Ok(code) => match store.load(&code) {
            Ok(dict) => return Ok(dict),
            Err(e) => tracing::warn!("Locale language {} failed to load: {}", code, e),
        },
        Err(e) => tracing::info!("{}; using {}", e, default_language),
    }

    store.load(default_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_locale_string() {
        assert_eq!(region_from_locale_string("es_ES.UTF-8").as_deref(), Some("ES"));
        assert_eq!(region_from_locale_string("en_gb@euro").as_deref(), Some("GB"));
        assert_eq!(region_from_locale_string("pt-BR").as_deref(), Some("BR"));
        assert_eq!(region_from_locale_string("C"), None);
        assert_eq!(region_from_locale_string("POSIX"), None);
        assert_eq!(region_from_locale_string("en_"), None);
        assert_eq!(region_from_locale_string("zh-Hans-CN").as_deref(), Some("CN"));
        assert_eq!(region_from_locale_string("es-419").as_deref(), Some("419"));
        assert_eq!(region_from_locale_string("zh-Hans"), None);
    }

    #[test]
    fn test_supported_region_maps_to_language() {
        let store = LanguageStore::bundled();
        assert_eq!(get_language_from_locale(&store, "US").unwrap(), "EN");
        assert_eq!(get_language_from_locale(&store, "mx").unwrap(), "ES");
    }

    #[test]
    fn test_unsupported_region_falls_back_to_default() {
        let store = LanguageStore::bundled();
        let err = get_language_from_locale(&store, "JP").unwrap_err();
        assert!(matches!(err, LocaleError::LanguageNotFound(ref r) if r == "JP"));

        // The caller substitutes the default language
        let code = get_language_from_locale(&store, "JP").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());
        assert_eq!(code, "EN");
    }

    #[test]
    fn test_resolve_dictionary_prefers_override() {
        let store = LanguageStore::bundled();
        let dict = resolve_dictionary(&store, Some("es"), DEFAULT_LANGUAGE).unwrap();
        assert_eq!(dict.language(), "ES");
    }

    #[test]
    fn test_resolve_dictionary_ignores_unknown_override() {
        let store = LanguageStore::bundled();
        let dict = resolve_dictionary(&store, Some("xx"), DEFAULT_LANGUAGE).unwrap();
        // Whatever the test machine's locale is, a shipped language is loaded
        assert!(["EN", "ES"].contains(&dict.language()));
    }
}
