#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reconstruction of employment episodes from vida laboral table rows.
//!
//! Table extraction of a vida laboral PDF produces noisy rows: one visual
//! line split over several cells, a worker's name wrapped onto its own row,
//! status lines separated from the worker they belong to. This crate turns
//! those rows back into one [`EmployeeEpisode`] per worker and status event.
//!
//! The pipeline is:
//!
//! 1. [`normalize::normalize`] flattens each row into a single line.
//! 2. [`identity::extract_identity`] and [`episode::extract_episode`] pull
//!    the fields each line carries.
//! 3. [`reconstruct::reconstruct`] stitches lines into records.
//! 4. [`sanitize::sanitize`] drops corrupted records, fills defaults and
//!    orders the output.
//!
//! Parsing never fails: malformed rows are skipped and counted in the
//! [`ParseReport`].

pub mod config;
pub mod episode;
pub mod identity;
pub mod normalize;
pub mod reconstruct;
pub mod report;
pub mod sanitize;

pub use config::ParserConfig;
pub use report::{FieldCoverage, ParseReport};
use vida_laboral_episode_models::{EmployeeEpisode, RawRow};

/// Errors from loading a [`ParserConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has wrongly typed keys.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Final records of a run and the diagnostics collected along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub episodes: Vec<EmployeeEpisode>,
    pub report: ParseReport,
}

/// Parses a document's raw rows into sanitized episode records.
///
/// An empty result is a valid outcome: the document had no recognizable
/// worker blocks.
#[must_use]
pub fn parse_rows(rows: &[RawRow], config: &ParserConfig) -> ParseOutcome {
    let reconstruction = reconstruct::reconstruct(rows, config);
    let sanitized = sanitize::sanitize(reconstruction.episodes, config);
    let report = ParseReport::new(reconstruction.stats, &sanitized);

    if sanitized.episodes.is_empty() {
        log::warn!("No episodes found in {} row(s)", rows.len());
    }

    ParseOutcome {
        episodes: sanitized.episodes,
        report,
    }
}

#[cfg(test)]
mod tests {
    use vida_laboral_episode_models::EpisodeStatus;

    use super::*;
    use crate::config::CORRUPTED_NAME;

    fn rows(lines: &[&str]) -> Vec<RawRow> {
        lines.iter().map(|l| RawRow::from_values([*l])).collect()
    }

    #[test]
    fn split_worker_block_yields_one_full_episode() {
        let out = parse_rows(
            &rows(&[
                "... 12 345678901 ...",
                "JUAN PEREZ GARCIA",
                "ALTA 10-05-2018 10-05-2018 08 540 1,80 1,50 3,30 1794",
            ]),
            &ParserConfig::default(),
        );

        assert_eq!(out.episodes.len(), 1);
        let e = &out.episodes[0];
        assert_eq!(e.affiliation_number.as_deref(), Some("12 345678901"));
        assert_eq!(e.name.as_deref(), Some("JUAN PEREZ GARCIA"));
        assert_eq!(e.status, Some(EpisodeStatus::Hire));
        assert_eq!(e.hire_real_date.as_deref(), Some("10-05-2018"));
        assert_eq!(e.hire_effective_date.as_deref(), Some("10-05-2018"));
        assert_eq!(e.contribution_group.as_deref(), Some("08"));
        assert_eq!(e.contract_type.as_deref(), Some("540"));
        assert_eq!(e.rate.as_deref(), Some("1,80"));
        assert_eq!(e.base_amount.as_deref(), Some("1,50"));
        assert_eq!(e.total.as_deref(), Some("3,30"));
        assert_eq!(e.days_contributed.as_deref(), Some("1794"));
        assert_eq!(e.part_time_percentage.as_deref(), Some("100"));
        assert_eq!(e.termination_real_date, None);
    }

    #[test]
    fn cells_of_one_visual_line_are_joined() {
        let row = RawRow::from_cells([
            ("SITUACION", Some("ALTA")),
            ("F.REAL", Some("10-05-2018")),
            ("F.EFECTO", Some("10-05-2018")),
            ("G.C/M", Some("08")),
            ("T.C.", Some("540")),
            ("C.T.P.", None),
            ("TIPOS", Some("1,80")),
            ("IMS", Some("1,50")),
            ("TOTAL", Some("3,30")),
            ("DIAS", Some("1794")),
        ]);
        let identity = RawRow::from_cells([
            ("NAF", Some("12 345678901")),
            ("IPF", Some("1 12345678Z")),
            ("NOMBRE", Some("JUAN PEREZ GARCIA")),
        ]);

        let out = parse_rows(&[identity, row], &ParserConfig::default());
        assert_eq!(out.episodes.len(), 1);
        assert_eq!(out.episodes[0].national_id.as_deref(), Some("1 12345678Z"));
        assert_eq!(out.episodes[0].days_contributed.as_deref(), Some("1794"));
    }

    #[test]
    fn output_is_sorted_and_clean() {
        let out = parse_rows(
            &rows(&[
                "28 2222222222 1 22222222B SERRANO VEGA LUCIA",
                "ALTA 01-02-2019 01-02-2019 08 401 1,80 1,50 3,30 30",
                "nan nan",
                &format!("28 3333333333 {CORRUPTED_NAME}"),
                "ALTA 01-02-2019 01-02-2019 08 401 1,80 1,50 3,30 30",
                "28 1111111111 1 11111111A GARCIA LOPEZ MARIA",
                "ALTA 01-01-2020 01-01-2020 08 502 \
                 BAJA 01-01-2020 01-01-2020 30-06-2020 30-06-2020 08 502 1,80 1,50 3,30 181",
            ]),
            &ParserConfig::default(),
        );

        let summary: Vec<_> = out
            .episodes
            .iter()
            .map(|e| (e.affiliation_number.as_deref(), e.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("28 1111111111"), Some(EpisodeStatus::Hire)),
                (Some("28 1111111111"), Some(EpisodeStatus::Termination)),
                (Some("28 2222222222"), Some(EpisodeStatus::Hire)),
            ]
        );
        assert_eq!(out.report.dropped_corrupted, 1);
        assert_eq!(out.report.workers, 2);
        assert_eq!(out.report.reconstruction.combined_splits, 1);
        assert_eq!(out.report.coverage.part_time_percentage, 3);
    }

    #[test]
    fn no_worker_blocks_is_an_empty_outcome() {
        let out = parse_rows(
            &rows(&["VIDA LABORAL", "Página 1 de 3"]),
            &ParserConfig::default(),
        );
        assert!(out.episodes.is_empty());
        assert_eq!(out.report.reconstruction.rows_read, 2);
        assert_eq!(out.report.episodes, 0);

        assert!(parse_rows(&[], &ParserConfig::default()).episodes.is_empty());
    }
}
