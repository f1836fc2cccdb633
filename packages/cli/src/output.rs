//! Writing episode records and raw rows.

use std::io::Write;

use clap::ValueEnum;
use vida_laboral_episode_models::{EmployeeEpisode, RawRow};

use crate::RowsError;

/// Output format for episode records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per record with a header row.
    #[default]
    Csv,
    /// A pretty-printed JSON array.
    Json,
}

/// Writes `episodes` to `writer` in `format`.
///
/// # Errors
///
/// Returns a [`RowsError`] if serialization or the write fails.
pub fn write_episodes<W: Write>(
    writer: W,
    episodes: &[EmployeeEpisode],
    format: OutputFormat,
) -> Result<(), RowsError> {
    match format {
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for episode in episodes {
                csv.serialize(episode)?;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, episodes)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Writes raw rows as a CSV readable by [`crate::input::rows_from_csv`].
///
/// Rows are padded to the widest row and the header row is
/// `col_0,col_1,...`. Absent cells are written empty.
///
/// # Errors
///
/// Returns a [`RowsError`] if the write fails.
pub fn write_rows<W: Write>(writer: W, rows: &[RawRow]) -> Result<(), RowsError> {
    let width = rows.iter().map(RawRow::len).max().unwrap_or(0);
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record((0..width).map(|i| format!("col_{i}")))?;
    for row in rows {
        let mut record: Vec<&str> = row.values().map(Option::unwrap_or_default).collect();
        record.resize(width, "");
        csv.write_record(&record)?;
    }
    csv.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use vida_laboral_episode_models::EpisodeStatus;

    use super::*;
    use crate::input::rows_from_csv;

    fn episode() -> EmployeeEpisode {
        EmployeeEpisode {
            affiliation_number: Some("12 345678901".to_owned()),
            name: Some("JUAN PEREZ GARCIA".to_owned()),
            status: Some(EpisodeStatus::Hire),
            hire_real_date: Some("10-05-2018".to_owned()),
            part_time_percentage: Some("100".to_owned()),
            ..EmployeeEpisode::default()
        }
    }

    #[test]
    fn csv_has_camel_case_header_and_document_labels() {
        let mut out = Vec::new();
        write_episodes(&mut out, &[episode()], OutputFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("affiliationNumber,nationalId,name,status,hireRealDate"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("12 345678901,,JUAN PEREZ GARCIA,ALTA,10-05-2018"));
    }

    #[test]
    fn json_is_an_array_of_records() {
        let mut out = Vec::new();
        write_episodes(&mut out, &[episode()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["status"], "ALTA");
        assert_eq!(value[0]["partTimePercentage"], "100");
        assert!(value[0]["terminationRealDate"].is_null());
    }

    #[test]
    fn written_rows_read_back_with_the_same_values() {
        let rows = vec![
            RawRow::from_values(["28 1234567890", "GARCIA LOPEZ MARIA"]),
            RawRow::from_cells([("a", Some("ALTA")), ("b", None), ("c", Some("08"))]),
        ];
        let mut out = Vec::new();
        write_rows(&mut out, &rows).unwrap();

        let back = rows_from_csv(out.as_slice()).unwrap();
        let values: Vec<Vec<_>> = back.iter().map(|r| r.values().collect()).collect();
        assert_eq!(
            values,
            vec![
                vec![Some("28 1234567890"), Some("GARCIA LOPEZ MARIA"), None],
                vec![Some("ALTA"), None, Some("08")],
            ]
        );
    }
}
