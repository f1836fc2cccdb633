//! Run diagnostics: what was read, what was dropped, and how complete the
//! surviving records are.

use serde::Serialize;
use vida_laboral_episode_models::EmployeeEpisode;

use crate::reconstruct::ReconstructionStats;
use crate::sanitize::Sanitized;

/// How many output records have each field set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCoverage {
    pub affiliation_number: usize,
    pub national_id: usize,
    pub name: usize,
    pub status: usize,
    pub hire_real_date: usize,
    pub hire_effective_date: usize,
    pub termination_real_date: usize,
    pub termination_effective_date: usize,
    pub contribution_group: usize,
    pub contract_type: usize,
    pub part_time_percentage: usize,
    pub rate: usize,
    pub base_amount: usize,
    pub total: usize,
    pub days_contributed: usize,
    pub situation_code: usize,
}

impl FieldCoverage {
    #[must_use]
    pub fn from_episodes(episodes: &[EmployeeEpisode]) -> Self {
        let mut coverage = Self::default();
        for e in episodes {
            let count = |slot: &mut usize, present: bool| *slot += usize::from(present);
            count(&mut coverage.affiliation_number, e.affiliation_number.is_some());
            count(&mut coverage.national_id, e.national_id.is_some());
            count(&mut coverage.name, e.name.is_some());
            count(&mut coverage.status, e.status.is_some());
            count(&mut coverage.hire_real_date, e.hire_real_date.is_some());
            count(&mut coverage.hire_effective_date, e.hire_effective_date.is_some());
            count(&mut coverage.termination_real_date, e.termination_real_date.is_some());
            count(
                &mut coverage.termination_effective_date,
                e.termination_effective_date.is_some(),
            );
            count(&mut coverage.contribution_group, e.contribution_group.is_some());
            count(&mut coverage.contract_type, e.contract_type.is_some());
            count(&mut coverage.part_time_percentage, e.part_time_percentage.is_some());
            count(&mut coverage.rate, e.rate.is_some());
            count(&mut coverage.base_amount, e.base_amount.is_some());
            count(&mut coverage.total, e.total.is_some());
            count(&mut coverage.days_contributed, e.days_contributed.is_some());
            count(&mut coverage.situation_code, e.situation_code.is_some());
        }
        coverage
    }
}

/// Summary of one [`crate::parse_rows`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub reconstruction: ReconstructionStats,
    pub dropped_corrupted: usize,
    pub dropped_without_identity: usize,
    /// Records in the final output.
    pub episodes: usize,
    /// Distinct workers among the final records, by affiliation number.
    pub workers: usize,
    pub coverage: FieldCoverage,
}

impl ParseReport {
    #[must_use]
    pub fn new(reconstruction: ReconstructionStats, sanitized: &Sanitized) -> Self {
        let mut affiliations: Vec<&str> = sanitized
            .episodes
            .iter()
            .filter_map(|e| e.affiliation_number.as_deref())
            .collect();
        affiliations.dedup();

        Self {
            reconstruction,
            dropped_corrupted: sanitized.dropped_corrupted,
            dropped_without_identity: sanitized.dropped_without_identity,
            episodes: sanitized.episodes.len(),
            workers: affiliations.len(),
            coverage: FieldCoverage::from_episodes(&sanitized.episodes),
        }
    }

    /// Logs the summary at `info` level.
    pub fn log(&self) {
        log::info!(
            "{} episode(s) for {} worker(s); {} row(s) read, {} skipped, {} orphaned, {} dropped",
            self.episodes,
            self.workers,
            self.reconstruction.rows_read,
            self.reconstruction.rows_skipped,
            self.reconstruction.orphan_lines,
            self.dropped_corrupted + self.dropped_without_identity,
        );
        log::debug!("Field coverage: {:?}", self.coverage);
    }
}
