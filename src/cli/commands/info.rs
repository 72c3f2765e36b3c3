//! Help, version and settings commands.

use crate::config::{self, Config};
use crate::locale::LanguageDictionary;

/// Print the localized help message
pub fn cmd_help(dict: &LanguageDictionary) {
    println!("{}", help_text(dict));
}

/// Print the localized version line
pub fn cmd_version(dict: &LanguageDictionary) {
    println!("{}", version_text(dict));
}

/// Persist `config` as the new defaults.
///
/// A failure is reported but does not stop the run.
pub fn cmd_write_config(config: &Config, dict: &LanguageDictionary) {
    match config::save(config) {
        Ok(path) => println!("{}", dict.format("config_saved", &[&path.display()])),
        Err(e) => {
            tracing::error!("Failed to save config: {}", e);
            eprintln!("Error: {e}");
        }
    }
}

fn help_text(dict: &LanguageDictionary) -> String {
    dict.format("help_message", &[&dict.t("app_description")])
}

fn version_text(dict: &LanguageDictionary) -> String {
    dict.format("version_text", &[&env!("CARGO_PKG_VERSION")])
}
