//! Row flattening.
//!
//! Table backends split a single visual PDF line over several cells, and
//! embed `(cid:N)` placeholders where a glyph could not be mapped to a
//! character. Every extractor works on the flattened, cleaned line instead
//! of individual cells.

use std::sync::LazyLock;

use regex::Regex;
use vida_laboral_episode_models::RawRow;

use crate::config::ParserConfig;

/// Unmapped-glyph placeholders, e.g. `(cid:3)`.
static CID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(cid:\d+\)").expect("valid regex"));

/// Flattens `row` into a single line.
///
/// Non-empty cells that are not missing-value sentinels are joined with a
/// single space in column order, `(cid:N)` artifacts are removed and
/// whitespace is collapsed. An empty result means the row carries nothing.
#[must_use]
pub fn normalize(row: &RawRow, config: &ParserConfig) -> String {
    let joined = row
        .values()
        .flatten()
        .map(str::trim)
        .filter(|cell| !cell.is_empty() && !config.is_missing(cell))
        .collect::<Vec<_>>()
        .join(" ");

    let cleaned = CID_RE.replace_all(&joined, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
