//! Single-pass reconstruction of employment episodes.
//!
//! Table extraction splits one worker block over several rows: the identity
//! row (affiliation number, national ID, name), sometimes a separate row
//! with the wrapped name, then one or more `ALTA`/`BAJA` rows. The pass keeps
//! at most one open worker and a short buffer of recently emitted records,
//! and stitches episode rows onto the worker they belong to.
//!
//! Association is bounded on both sides:
//! - an open worker only accepts rows within
//!   [`ParserConfig::lookahead_rows`] of its last activity;
//! - an episode row with no open worker looks back
//!   [`ParserConfig::lookback_rows`] rows for an identity whose buffered
//!   record has no status yet.
//!
//! Rows outside those windows are skipped, never reported as errors.

use std::collections::VecDeque;

use serde::Serialize;
use vida_laboral_episode_models::{
    EmployeeEpisode, EpisodeFields, EpisodeStatus, IdentityFields, RawRow,
};

use crate::config::ParserConfig;
use crate::episode::extract_episode;
use crate::identity::{extract_identity, extract_name_row, extract_situation_code};
use crate::normalize::normalize;

/// Counters describing one reconstruction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionStats {
    /// Rows consumed.
    pub rows_read: usize,
    /// Rows that contributed nothing (blank, header or noise rows).
    pub rows_skipped: usize,
    /// Identity rows that opened a worker.
    pub workers_opened: usize,
    /// Rows that supplied the name of an open worker.
    pub names_continued: usize,
    /// Rows carrying an `ALTA`/`BAJA` episode.
    pub episode_lines: usize,
    /// Combined hire-and-termination events split into two records.
    pub combined_splits: usize,
    /// Episode rows attached to an already emitted record.
    pub retroactive_attachments: usize,
    /// Episode rows with no worker to attach to.
    pub orphan_lines: usize,
    /// Open workers closed because no episode arrived within the window.
    pub windows_expired: usize,
}

/// Output of [`reconstruct`]: records in emission order plus counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    pub episodes: Vec<EmployeeEpisode>,
    pub stats: ReconstructionStats,
}

/// Rebuilds episode records from raw rows in one forward pass.
#[must_use]
pub fn reconstruct(rows: &[RawRow], config: &ParserConfig) -> Reconstruction {
    let mut pass = Pass::new(config);
    for (index, row) in rows.iter().enumerate() {
        let line = normalize(row, config);
        pass.step(index, &line);
    }
    pass.finish()
}

/// A worker whose episode rows are still being collected.
#[derive(Debug)]
struct OpenWorker {
    identity: IdentityFields,
    episode: EpisodeFields,
    /// Row index of the last row that contributed to this worker.
    last_activity: usize,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    NoOpenWorker,
    OpenWorker(OpenWorker),
}

struct Pass<'a> {
    config: &'a ParserConfig,
    state: State,
    /// Identity found on each of the last `lookback_rows` rows, oldest
    /// first.
    recent_identities: VecDeque<Option<IdentityFields>>,
    /// Recently emitted records, still amendable by retroactive attachment.
    trailing: VecDeque<EmployeeEpisode>,
    emitted: Vec<EmployeeEpisode>,
    stats: ReconstructionStats,
}

impl<'a> Pass<'a> {
    fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            state: State::NoOpenWorker,
            recent_identities: VecDeque::new(),
            trailing: VecDeque::new(),
            emitted: Vec::new(),
            stats: ReconstructionStats::default(),
        }
    }

    fn step(&mut self, index: usize, line: &str) {
        self.stats.rows_read += 1;

        let identity = if line.is_empty() {
            self.stats.rows_skipped += 1;
            None
        } else {
            let identity = extract_identity(line);
            self.handle(index, line, identity.clone());
            identity
        };

        self.recent_identities.push_back(identity);
        while self.recent_identities.len() > self.config.lookback_rows {
            self.recent_identities.pop_front();
        }
    }

    fn handle(&mut self, index: usize, line: &str, identity: Option<IdentityFields>) {
        let episode = extract_episode(line);

        if let Some(identity) = identity {
            self.close_worker();
            self.stats.workers_opened += 1;
            log::debug!(
                "Row {index}: opened worker {}",
                identity
                    .affiliation_number
                    .as_deref()
                    .or(identity.national_id.as_deref())
                    .unwrap_or("?")
            );
            // The trailing token of a row that also carries an episode
            // belongs to the episode tail.
            let situation_code = episode
                .status
                .is_none()
                .then(|| extract_situation_code(line))
                .flatten();
            self.state = State::OpenWorker(OpenWorker {
                identity,
                episode: EpisodeFields {
                    situation_code,
                    ..EpisodeFields::default()
                },
                last_activity: index,
            });
            if episode.is_signal() {
                self.stats.episode_lines += 1;
                self.merge_into_open(index, episode);
            }
            return;
        }

        if episode.is_signal() {
            self.stats.episode_lines += 1;
            self.expire_worker(index);
            if matches!(self.state, State::OpenWorker(_)) {
                self.merge_into_open(index, episode);
            } else {
                self.attach_orphan(index, episode);
            }
            return;
        }

        if episode.status.is_some() || !self.continue_name(index, line) {
            self.stats.rows_skipped += 1;
            log::debug!("Row {index}: no identity or episode, skipped");
        }
    }

    fn finish(mut self) -> Reconstruction {
        self.close_worker();
        self.emitted.extend(self.trailing.drain(..));

        log::info!(
            "Reconstructed {} episode(s) from {} row(s) ({} worker(s), {} skipped, {} orphaned)",
            self.emitted.len(),
            self.stats.rows_read,
            self.stats.workers_opened,
            self.stats.rows_skipped,
            self.stats.orphan_lines
        );

        Reconstruction {
            episodes: self.emitted,
            stats: self.stats,
        }
    }

    /// Whether `index` is too far from the open worker's last activity.
    fn beyond_window(&self, worker: &OpenWorker, index: usize) -> bool {
        index.saturating_sub(worker.last_activity) > self.config.lookahead_rows
    }

    /// Closes the open worker if `index` falls outside its window.
    fn expire_worker(&mut self, index: usize) {
        if let State::OpenWorker(worker) = &self.state
            && self.beyond_window(worker, index)
        {
            log::debug!(
                "Row {index}: worker opened at row {} expired without a nearby episode",
                worker.last_activity
            );
            self.stats.windows_expired += 1;
            self.close_worker();
        }
    }

    /// Emits the open worker as it stands, episode or not.
    fn close_worker(&mut self) {
        if let State::OpenWorker(worker) = std::mem::take(&mut self.state) {
            self.emit(EmployeeEpisode::new(&worker.identity, worker.episode));
        }
    }

    fn merge_into_open(&mut self, index: usize, episode: EpisodeFields) {
        let State::OpenWorker(mut worker) = std::mem::take(&mut self.state) else {
            return;
        };

        merge(&mut worker.episode, episode);
        worker.last_activity = index;

        if worker.episode.status == Some(EpisodeStatus::HireAndTermination) {
            self.stats.combined_splits += 1;
            for record in split(&worker.identity, worker.episode) {
                self.emit(record);
            }
        } else {
            self.state = State::OpenWorker(worker);
        }
    }

    /// Handles an episode row that arrived with no open worker.
    fn attach_orphan(&mut self, index: usize, episode: EpisodeFields) {
        let found = self
            .recent_identities
            .iter()
            .rev()
            .enumerate()
            .find_map(|(distance, identity)| {
                let identity = identity.as_ref()?;
                self.trailing
                    .iter()
                    .rposition(|r| r.status.is_none() && r.identity().same_worker(identity))
                    .map(|pos| (distance, pos))
            });

        let Some((distance, pos)) = found else {
            self.stats.orphan_lines += 1;
            log::debug!("Row {index}: episode with no owning worker, skipped");
            return;
        };

        log::debug!(
            "Row {index}: episode attached retroactively to worker of row {}",
            index - distance - 1
        );
        self.stats.retroactive_attachments += 1;

        let identity = self.trailing[pos].identity();
        let mut fields = self.trailing[pos].episode();
        merge(&mut fields, episode);

        if fields.status == Some(EpisodeStatus::HireAndTermination) {
            self.stats.combined_splits += 1;
            let [hire, termination] = split(&identity, fields);
            self.trailing[pos] = hire;
            self.trailing.insert(pos + 1, termination);
            self.flush_overflow();
        } else {
            self.trailing[pos] = EmployeeEpisode::new(&identity, fields);
        }
    }

    /// Fills in the open worker's name from a row that carries only a name.
    /// Rows with anything else on them (headers, page footers) are refused.
    fn continue_name(&mut self, index: usize, line: &str) -> bool {
        let State::OpenWorker(worker) = &self.state else {
            return false;
        };
        if worker.identity.name.is_some() || self.beyond_window(worker, index) {
            return false;
        }
        let Some(name) = extract_name_row(line) else {
            return false;
        };

        if let State::OpenWorker(worker) = &mut self.state {
            log::debug!("Row {index}: name continuation {name:?}");
            worker.identity.name = Some(name);
            worker.last_activity = index;
            self.stats.names_continued += 1;
        }
        true
    }

    fn emit(&mut self, record: EmployeeEpisode) {
        self.trailing.push_back(record);
        self.flush_overflow();
    }

    fn flush_overflow(&mut self) {
        while self.trailing.len() > self.config.trailing_buffer {
            if let Some(record) = self.trailing.pop_front() {
                self.emitted.push(record);
            }
        }
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Merges a newly seen episode row into a worker's partial episode.
///
/// Hire dates and codes keep the first value seen. Termination dates take
/// the latest row carrying them: a worker may accumulate several `BAJA`
/// rows and only the last one is the final status.
pub fn merge(target: &mut EpisodeFields, incoming: EpisodeFields) {
    target.status = EpisodeStatus::combine(target.status, incoming.status);

    if incoming.termination_real_date.is_some() || incoming.termination_effective_date.is_some() {
        target.termination_real_date = incoming.termination_real_date;
        target.termination_effective_date = incoming.termination_effective_date;
    }

    fill(&mut target.hire_real_date, incoming.hire_real_date);
    fill(&mut target.hire_effective_date, incoming.hire_effective_date);
    fill(&mut target.contribution_group, incoming.contribution_group);
    fill(&mut target.contract_type, incoming.contract_type);
    fill(&mut target.part_time_percentage, incoming.part_time_percentage);
    fill(&mut target.rate, incoming.rate);
    fill(&mut target.base_amount, incoming.base_amount);
    fill(&mut target.total, incoming.total);
    fill(&mut target.days_contributed, incoming.days_contributed);
    fill(&mut target.situation_code, incoming.situation_code);
}

/// Splits a combined hire-and-termination episode into its two records.
///
/// The hire record keeps the hire dates, the contract codes and the
/// situation code; the termination record keeps everything.
#[must_use]
pub fn split(identity: &IdentityFields, episode: EpisodeFields) -> [EmployeeEpisode; 2] {
    let hire = EpisodeFields {
        status: Some(EpisodeStatus::Hire),
        hire_real_date: episode.hire_real_date.clone(),
        hire_effective_date: episode.hire_effective_date.clone(),
        contribution_group: episode.contribution_group.clone(),
        contract_type: episode.contract_type.clone(),
        part_time_percentage: episode.part_time_percentage.clone(),
        situation_code: episode.situation_code.clone(),
        ..EpisodeFields::default()
    };
    let termination = EpisodeFields {
        status: Some(EpisodeStatus::Termination),
        ..episode
    };

    [
        EmployeeEpisode::new(identity, hire),
        EmployeeEpisode::new(identity, termination),
    ]
}
