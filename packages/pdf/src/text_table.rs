//! Splitting extracted PDF text into table rows.
//!
//! Handles three layouts:
//! - **Gap-separated columns**: cells are separated by runs of two or more
//!   spaces, the usual output of text extraction for printed tables
//! - **Fixed-width columns**: cells are at known character positions
//! - **Delimited lines**: cells are separated by a delimiter string

use std::sync::LazyLock;

use regex::Regex;
use vida_laboral_episode_models::RawRow;

static GAP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Splits each non-blank line at runs of two or more whitespace characters.
///
/// Columns are labelled `col_0`, `col_1`, ... in left-to-right order.
#[must_use]
pub fn split_gaps(text: &str) -> Vec<RawRow> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| RawRow::from_values(GAP_RE.split(line)))
        .collect()
}

/// Splits each non-blank line at the given character positions.
///
/// Cell `i` spans from `column_starts[i]` up to the next start (or the end
/// of the line) and is labelled `column_names[i]`. Positions count
/// characters, not bytes. Cells past the end of a short line, or blank
/// after trimming, are absent.
#[must_use]
pub fn split_columns(text: &str, column_starts: &[usize], column_names: &[String]) -> Vec<RawRow> {
    let mut rows = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut row = RawRow::new();

        for (i, name) in column_names.iter().enumerate() {
            let start = column_starts.get(i).copied().unwrap_or(0).min(chars.len());
            let end = column_starts
                .get(i + 1)
                .copied()
                .unwrap_or(chars.len())
                .clamp(start, chars.len());

            let value: String = chars[start..end].iter().collect();
            row.push(name.clone(), non_empty(&value));
        }

        rows.push(row);
    }

    rows
}

/// Splits each non-blank line by `delimiter`.
#[must_use]
pub fn split_delimited(text: &str, delimiter: &str) -> Vec<RawRow> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            RawRow::from_cells(
                line.split(delimiter)
                    .enumerate()
                    .map(|(i, cell)| (format!("col_{i}"), non_empty(cell))),
            )
        })
        .collect()
}
