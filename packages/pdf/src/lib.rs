#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw table rows from vida laboral PDFs.
//!
//! Extracts the text of a PDF with [`pdf_extract`] and splits it into
//! [`RawRow`]s using one of the layouts in [`text_table`]. The rows are as
//! noisy as the PDF; reassembling them is the parser's job.

pub mod text_table;

use std::path::Path;

use vida_laboral_episode_models::RawRow;

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How extracted text is split into rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Cells separated by runs of two or more spaces.
    #[default]
    Gaps,

    /// Cells at fixed character positions.
    FixedColumns {
        /// Character positions where each column starts. For example,
        /// `[0, 12, 30]` means column 1 is chars 0–11, column 2 is chars
        /// 12–29, etc.
        column_starts: Vec<usize>,
        /// Column labels, one per column start.
        column_names: Vec<String>,
    },

    /// Cells separated by a delimiter (e.g. `"|"` or `"\t"`).
    Delimited { delimiter: String },
}

impl ExtractionStrategy {
    /// Splits `text` into rows.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<RawRow> {
        match self {
            Self::Gaps => text_table::split_gaps(text),
            Self::FixedColumns {
                column_starts,
                column_names,
            } => text_table::split_columns(text, column_starts, column_names),
            Self::Delimited { delimiter } => text_table::split_delimited(text, delimiter),
        }
    }
}

/// Extracts the text content of an in-memory PDF.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!(
        "Extracted {} characters of text from {} bytes",
        text.len(),
        bytes.len()
    );

    Ok(text)
}

/// Reads a PDF file and splits its text into rows.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read, or
/// [`PdfError::Extraction`] if it is not a readable PDF.
pub fn extract_rows(
    path: impl AsRef<Path>,
    strategy: &ExtractionStrategy,
) -> Result<Vec<RawRow>, PdfError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let text = extract_text_from_mem(&bytes)?;
    let rows = strategy.split(&text);

    log::info!("Extracted {} row(s) from {}", rows.len(), path.display());

    Ok(rows)
}
