//! String cleanup helpers shared by the resolver, the catalog search and
//! the file naming logic.

use std::path::{Path, PathBuf};

/// Channel attribution markers appended by the media site to auto-generated
/// artist channels ("Artist - Topic").
const ARTIFACTS: &[&str] = &[" - Topic"];

/// Characters that are not allowed in file names on at least one of the
/// platforms we write to.
const INVALID_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Keep only alphanumeric and whitespace characters.
///
/// Punctuation regularly makes the catalog search return nothing, so
/// search terms go through this first.
pub fn clean_query(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Remove known attribution artifacts from a display name.
///
/// Only the first occurrence of each artifact is removed; everything else
/// is returned byte-identical.
pub fn remove_artifacts(name: &str) -> String {
    let mut clean = name.to_string();
    for artifact in ARTIFACTS {
        if let Some(pos) = clean.find(artifact) {
            clean.replace_range(pos..pos + artifact.len(), "");
        }
    }
    clean
}

/// Make a display name safe to use as a single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if INVALID_FILE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Trailing dots and spaces are stripped by Windows and break lookups
    let trimmed = replaced.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
