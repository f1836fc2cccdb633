//! Reading raw rows from a PDF or from a raw-row CSV.

use std::io::Read;
use std::path::Path;

use vida_laboral_episode_models::RawRow;
use vida_laboral_pdf::ExtractionStrategy;

use crate::RowsError;

/// Reads raw rows from `path`.
///
/// Files ending in `.pdf` (any case) go through PDF text extraction with
/// `strategy`; anything else is read as a raw-row CSV whose header row holds
/// the column labels.
///
/// # Errors
///
/// Returns a [`RowsError`] if the file cannot be read or parsed.
pub fn read_rows(path: &Path, strategy: &ExtractionStrategy) -> Result<Vec<RawRow>, RowsError> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        return Ok(vida_laboral_pdf::extract_rows(path, strategy)?);
    }

    let rows = rows_from_csv(std::fs::File::open(path)?)?;
    log::info!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parses a raw-row CSV. Blank cells become absent cells.
///
/// # Errors
///
/// Returns [`RowsError::Csv`] if the CSV is malformed.
pub fn rows_from_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, RowsError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (i, value) in record.iter().enumerate() {
            let label = headers
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("col_{i}"));
            let value = value.trim();
            row.push(label, (!value.is_empty()).then(|| value.to_owned()));
        }
        rows.push(row);
    }

    Ok(rows)
}
