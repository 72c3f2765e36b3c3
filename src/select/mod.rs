//! Interactive choice of the catalog candidate to embed.
//!
//! Candidates are listed as a table (index, artist, track, year, album,
//! genre) and the user answers with an index, `skip`, or anything else,
//! which selects the first row. Indices past the last displayed row are
//! clamped to it, with a warning.

use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

use crate::catalog::MetadataCandidate;
use crate::locale::LanguageDictionary;
use crate::tags::TagFields;

/// Keyword that cancels metadata embedding
const SKIP_KEYWORD: &str = "skip";

const COLUMN_SEPARATOR: &str = " | ";

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Skip,
    Index(usize),
}

/// Source of free-form answers.
///
/// Implement this trait to script answers in tests.
pub trait Prompt: Send + Sync {
    /// Show `message` and return the answer without its line terminator.
    fn ask(&self, message: &str) -> io::Result<String>;
}

/// Reads answers from standard input
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{message}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Interpret an answer. Non-numeric and negative input means the first row.
pub fn parse_selection(input: &str) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case(SKIP_KEYWORD) {
        return Selection::Skip;
    }
    match input.parse::<i64>() {
        Ok(n) if n >= 0 => Selection::Index(usize::try_from(n).unwrap_or(usize::MAX)),
        _ => Selection::Index(0),
    }
}

/// Clamp `index` to the last of `shown` rows. Returns whether it was clamped.
pub fn clamp_index(index: usize, shown: usize) -> (usize, bool) {
    let last = shown.saturating_sub(1);
    if index > last { (last, true) } else { (index, false) }
}

/// Table rows for at most `max_display` candidates
pub fn candidate_rows(
    candidates: &[MetadataCandidate],
    max_display: usize,
    dict: &LanguageDictionary,
) -> Vec<Vec<String>> {
    candidates
        .iter()
        .take(max_display)
        .enumerate()
        .map(|(i, candidate)| {
            let fields = TagFields::from_candidate(candidate, dict);
            vec![
                i.to_string(),
                fields.artist,
                fields.title,
                fields.year,
                fields.album,
                fields.genre,
            ]
        })
        .collect()
}

/// Localized column headers
pub fn column_headers(dict: &LanguageDictionary) -> Vec<String> {
    [
        "table_id",
        "table_artist_name",
        "table_track_name",
        "table_release_year",
        "table_album",
        "table_genre",
    ]
    .iter()
    .map(|key| dict.t(key).to_string())
    .collect()
}

/// Render an aligned plain-text table: header, separator, then one line per row.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR)
            .trim_end()
            .to_string()
    };

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(headers));
    lines.push(separator);
    lines.extend(rows.iter().map(|row| format_line(row)));
    lines
}

/// Ask which candidate to embed.
///
/// In auto-select mode the first candidate is chosen without prompting.
pub fn choose(
    candidates: &[MetadataCandidate],
    max_display: usize,
    auto_select: bool,
    dict: &LanguageDictionary,
    prompt: &dyn Prompt,
) -> io::Result<Selection> {
    if auto_select {
        return Ok(Selection::Index(0));
    }

    let rows = candidate_rows(candidates, max_display, dict);
    let lines = render_table(&column_headers(dict), &rows);

    println!();
    println!("{}", dict.t("metadata_table_name").bold());
    for (i, line) in lines.iter().enumerate() {
        if i < 2 {
            println!("{}", line.as_str().bold());
        } else {
            println!("{}", line.as_str().green());
        }
    }

    let answer = prompt.ask(dict.t("select_metadata_prompt"))?;
    match parse_selection(&answer) {
        Selection::Skip => Ok(Selection::Skip),
        Selection::Index(index) => {
            let (index, clamped) = clamp_index(index, rows.len());
            if clamped {
                tracing::warn!("Selection {:?} out of range, using {}", answer, index);
                println!("{}", dict.format("selection_clamped", &[&index]));
            }
            Ok(Selection::Index(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LanguageStore;
    use crate::test_utils::mocks::ScriptedPrompt;

    fn english() -> LanguageDictionary {
        LanguageStore::bundled().load("EN").unwrap()
    }

    fn candidates(n: usize) -> Vec<MetadataCandidate> {
        (0..n)
            .map(|i| MetadataCandidate {
                artist: Some(format!("Artist {i}")),
                track: Some(format!("Track {i}")),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("skip"), Selection::Skip);
        assert_eq!(parse_selection("  SKIP \n"), Selection::Skip);
        assert_eq!(parse_selection("3"), Selection::Index(3));
        assert_eq!(parse_selection(" 2 "), Selection::Index(2));
    }

    #[test]
    fn test_non_numeric_input_selects_first() {
        assert_eq!(parse_selection("abc"), Selection::Index(0));
        assert_eq!(parse_selection(""), Selection::Index(0));
        assert_eq!(parse_selection("-1"), Selection::Index(0));
        assert_eq!(parse_selection("1.5"), Selection::Index(0));
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(0, 3), (0, false));
        assert_eq!(clamp_index(2, 3), (2, false));
        assert_eq!(clamp_index(7, 3), (2, true));
        assert_eq!(clamp_index(1, 0), (0, true));
    }

    #[test]
    fn test_candidate_rows_respect_max_display() {
        let rows = candidate_rows(&candidates(20), 15, &english());
        assert_eq!(rows.len(), 15);
        assert_eq!(rows[14][0], "14");

        let rows = candidate_rows(&candidates(2), 15, &english());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_candidate_rows_use_placeholders() {
        let rows = candidate_rows(&candidates(1), 15, &english());
        assert_eq!(
            rows[0],
            vec!["0", "Artist 0", "Track 0", "unknown year", "unknown album", "unknown genre"]
        );
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let headers = vec!["ID".to_string(), "Artist".to_string()];
        let rows = vec![
            vec!["0".to_string(), "Björk".to_string()],
            vec!["10".to_string(), "A".to_string()],
        ];
        let lines = render_table(&headers, &rows);
        assert_eq!(lines, vec!["ID | Artist", "---+-------", "0  | Björk", "10 | A"]);
    }

    #[test]
    fn test_choose_auto_select_does_not_prompt() {
        let prompt = ScriptedPrompt::new(&[]);
        let selection = choose(&candidates(3), 15, true, &english(), &prompt).unwrap();
        assert_eq!(selection, Selection::Index(0));
        assert_eq!(prompt.asked(), 0);
    }

    #[test]
    fn test_choose_clamps_out_of_range() {
        let prompt = ScriptedPrompt::new(&["42"]);
        let selection = choose(&candidates(3), 15, false, &english(), &prompt).unwrap();
        assert_eq!(selection, Selection::Index(2));
        assert_eq!(prompt.asked(), 1);
    }

    #[test]
    fn test_choose_clamps_to_displayed_rows() {
        let prompt = ScriptedPrompt::new(&["8"]);
        let selection = choose(&candidates(10), 5, false, &english(), &prompt).unwrap();
        assert_eq!(selection, Selection::Index(4));
    }

    #[test]
    fn test_choose_skip() {
        let prompt = ScriptedPrompt::new(&["Skip"]);
        let selection = choose(&candidates(3), 15, false, &english(), &prompt).unwrap();
        assert_eq!(selection, Selection::Skip);
    }
}
