//! Final clean-up of reconstructed records.

use vida_laboral_episode_models::{EmployeeEpisode, FULL_TIME_PERCENTAGE};

use crate::config::ParserConfig;

/// Records that survived sanitizing, plus how many were dropped and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub episodes: Vec<EmployeeEpisode>,
    /// Records whose name is a known corrupted value.
    pub dropped_corrupted: usize,
    /// Records with no affiliation number, national ID or name.
    pub dropped_without_identity: usize,
}

/// Drops corrupted and identity-less records, fills the full-time default
/// and orders the records by affiliation number.
///
/// The sort is stable and records without an affiliation number go last.
/// Running this on its own output changes nothing.
#[must_use]
pub fn sanitize(episodes: Vec<EmployeeEpisode>, config: &ParserConfig) -> Sanitized {
    let mut dropped_corrupted = 0;
    let mut dropped_without_identity = 0;

    let mut episodes: Vec<EmployeeEpisode> = episodes
        .into_iter()
        .filter(|e| {
            if e.name
                .as_deref()
                .is_some_and(|name| config.corrupted_names.iter().any(|c| c == name))
            {
                dropped_corrupted += 1;
                return false;
            }
            if !e.identity().is_present() {
                dropped_without_identity += 1;
                return false;
            }
            true
        })
        .map(|mut e| {
            if e.part_time_percentage.is_none() {
                e.part_time_percentage = Some(FULL_TIME_PERCENTAGE.to_owned());
            }
            e
        })
        .collect();

    episodes.sort_by(|a, b| {
        match (a.affiliation_number.as_deref(), b.affiliation_number.as_deref()) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });

    if dropped_corrupted > 0 {
        log::info!("Dropped {dropped_corrupted} record(s) with a corrupted name");
    }
    if dropped_without_identity > 0 {
        log::info!("Dropped {dropped_without_identity} record(s) without identity");
    }

    Sanitized {
        episodes,
        dropped_corrupted,
        dropped_without_identity,
    }
}
