#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw row and employment episode types for vida laboral documents.
//!
//! A vida laboral ("working life") report lists, per worker, the hire
//! (`ALTA`) and termination (`BAJA`) events of their employment together
//! with the contribution codes printed next to each event. Table extraction
//! upstream produces [`RawRow`]s; the parser reassembles them into
//! [`EmployeeEpisode`] records.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Part-time percentage meaning a full-time schedule. The document omits
/// the column entirely for full-time contracts.
pub const FULL_TIME_PERCENTAGE: &str = "100";

/// One row as produced by a table-extraction backend.
///
/// Cells keep the column order of the source table. A cell is `None` when
/// the backend reported it as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<(String, Option<String>)>,
}

impl RawRow {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Creates a row from `(column label, cell)` pairs.
    #[must_use]
    pub fn from_cells<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(label, value)| (label.into(), value.map(Into::into)))
                .collect(),
        }
    }

    /// Creates a row from bare cell values, labelling the columns
    /// `col_0`, `col_1`, ...
    #[must_use]
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::from_cells(
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| (format!("col_{i}"), Some(value))),
        )
    }

    /// Appends a cell at the end of the row.
    pub fn push(&mut self, label: impl Into<String>, value: Option<String>) {
        self.cells.push((label.into(), value));
    }

    /// Iterates `(column label, cell)` pairs in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_deref()))
    }

    /// Iterates cell values in column order.
    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.cells.iter().map(|(_, value)| value.as_deref())
    }

    /// Number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Employment status printed in the `SITUACIÓN` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum EpisodeStatus {
    /// Hire event (`ALTA`).
    #[serde(rename = "ALTA")]
    #[strum(serialize = "ALTA")]
    Hire,
    /// Termination event (`BAJA`).
    #[serde(rename = "BAJA")]
    #[strum(serialize = "BAJA")]
    Termination,
    /// A single line carrying both a hire and a termination. Never present
    /// in reconstructed output: such lines are split into one [`Self::Hire`]
    /// and one [`Self::Termination`] record.
    #[serde(rename = "ALTA/BAJA")]
    #[strum(serialize = "ALTA/BAJA")]
    HireAndTermination,
}

impl EpisodeStatus {
    /// Combines the status already held by a worker with a newly seen one.
    ///
    /// Two different statuses make a combined hire-and-termination event.
    #[must_use]
    pub fn combine(current: Option<Self>, incoming: Option<Self>) -> Option<Self> {
        match (current, incoming) {
            (None, status) | (status, None) => status,
            (Some(a), Some(b)) if a == b => Some(a),
            (Some(_), Some(_)) => Some(Self::HireAndTermination),
        }
    }
}

/// Worker identity pulled from a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityFields {
    /// Social-security affiliation number, e.g. `"28 1234567890"`.
    pub affiliation_number: Option<String>,
    /// National identity document, e.g. `"1 12345678Z"`.
    pub national_id: Option<String>,
    /// Full name in upper case.
    pub name: Option<String>,
}

impl IdentityFields {
    /// Whether any identity field is present.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.affiliation_number.is_some() || self.national_id.is_some() || self.name.is_some()
    }

    /// Whether `other` refers to the same worker, judged by affiliation
    /// number or national ID. Absent numbers never match each other.
    #[must_use]
    pub fn same_worker(&self, other: &Self) -> bool {
        let same =
            |a: Option<&str>, b: Option<&str>| matches!((a, b), (Some(a), Some(b)) if a == b);
        same(
            self.affiliation_number.as_deref(),
            other.affiliation_number.as_deref(),
        ) || same(self.national_id.as_deref(), other.national_id.as_deref())
    }
}

/// Status, dates and coded fields pulled from a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFields {
    /// `None` when the line carries no `ALTA`/`BAJA` keyword.
    pub status: Option<EpisodeStatus>,
    /// `F.REAL ALTA`.
    pub hire_real_date: Option<String>,
    /// `F.EFECTO ALTA`.
    pub hire_effective_date: Option<String>,
    /// `F.REAL SIT.`
    pub termination_real_date: Option<String>,
    /// `F.EFECTO SIT.`
    pub termination_effective_date: Option<String>,
    /// `G.C/M` contribution group.
    pub contribution_group: Option<String>,
    /// `T.C.` contract type.
    pub contract_type: Option<String>,
    /// `C.T.P.` part-time percentage.
    pub part_time_percentage: Option<String>,
    /// `TIPOS AT/IT` rate; the decimal pivot of the trailing group.
    pub rate: Option<String>,
    /// `IMS` base amount.
    pub base_amount: Option<String>,
    /// `TOTAL`.
    pub total: Option<String>,
    /// `DÍAS COT.` days contributed.
    pub days_contributed: Option<String>,
    /// `CLV` situation code trailing the line.
    pub situation_code: Option<String>,
}

impl EpisodeFields {
    /// Whether at least one date was extracted.
    #[must_use]
    pub const fn has_dates(&self) -> bool {
        self.hire_real_date.is_some()
            || self.hire_effective_date.is_some()
            || self.termination_real_date.is_some()
            || self.termination_effective_date.is_some()
    }

    /// Whether the line is a real episode line: a status keyword backed by
    /// at least one date. Header rows mention the keywords without dates.
    #[must_use]
    pub const fn is_signal(&self) -> bool {
        self.status.is_some() && self.has_dates()
    }
}

/// One reconstructed employment episode: a worker and one status event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeEpisode {
    pub affiliation_number: Option<String>,
    pub national_id: Option<String>,
    pub name: Option<String>,
    pub status: Option<EpisodeStatus>,
    pub hire_real_date: Option<String>,
    pub hire_effective_date: Option<String>,
    pub termination_real_date: Option<String>,
    pub termination_effective_date: Option<String>,
    pub contribution_group: Option<String>,
    pub contract_type: Option<String>,
    pub part_time_percentage: Option<String>,
    pub rate: Option<String>,
    pub base_amount: Option<String>,
    pub total: Option<String>,
    pub days_contributed: Option<String>,
    pub situation_code: Option<String>,
}

impl EmployeeEpisode {
    /// Builds a record from a worker identity and one episode.
    #[must_use]
    pub fn new(identity: &IdentityFields, episode: EpisodeFields) -> Self {
        Self {
            affiliation_number: identity.affiliation_number.clone(),
            national_id: identity.national_id.clone(),
            name: identity.name.clone(),
            status: episode.status,
            hire_real_date: episode.hire_real_date,
            hire_effective_date: episode.hire_effective_date,
            termination_real_date: episode.termination_real_date,
            termination_effective_date: episode.termination_effective_date,
            contribution_group: episode.contribution_group,
            contract_type: episode.contract_type,
            part_time_percentage: episode.part_time_percentage,
            rate: episode.rate,
            base_amount: episode.base_amount,
            total: episode.total,
            days_contributed: episode.days_contributed,
            situation_code: episode.situation_code,
        }
    }

    /// The identity portion of the record.
    #[must_use]
    pub fn identity(&self) -> IdentityFields {
        IdentityFields {
            affiliation_number: self.affiliation_number.clone(),
            national_id: self.national_id.clone(),
            name: self.name.clone(),
        }
    }

    /// The episode portion of the record.
    #[must_use]
    pub fn episode(&self) -> EpisodeFields {
        EpisodeFields {
            status: self.status,
            hire_real_date: self.hire_real_date.clone(),
            hire_effective_date: self.hire_effective_date.clone(),
            termination_real_date: self.termination_real_date.clone(),
            termination_effective_date: self.termination_effective_date.clone(),
            contribution_group: self.contribution_group.clone(),
            contract_type: self.contract_type.clone(),
            part_time_percentage: self.part_time_percentage.clone(),
            rate: self.rate.clone(),
            base_amount: self.base_amount.clone(),
            total: self.total.clone(),
            days_contributed: self.days_contributed.clone(),
            situation_code: self.situation_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn status_uses_document_labels() {
        assert_eq!(EpisodeStatus::Hire.to_string(), "ALTA");
        assert_eq!(EpisodeStatus::HireAndTermination.as_ref(), "ALTA/BAJA");
        assert_eq!(
            EpisodeStatus::from_str("BAJA").unwrap(),
            EpisodeStatus::Termination
        );
        assert_eq!(
            serde_json::to_string(&EpisodeStatus::HireAndTermination).unwrap(),
            "\"ALTA/BAJA\""
        );
    }

    #[test]
    fn combining_different_statuses_yields_both() {
        use EpisodeStatus::{Hire, HireAndTermination, Termination};
        assert_eq!(EpisodeStatus::combine(None, Some(Hire)), Some(Hire));
        assert_eq!(EpisodeStatus::combine(Some(Hire), None), Some(Hire));
        assert_eq!(EpisodeStatus::combine(Some(Hire), Some(Hire)), Some(Hire));
        assert_eq!(
            EpisodeStatus::combine(Some(Hire), Some(Termination)),
            Some(HireAndTermination)
        );
        assert_eq!(
            EpisodeStatus::combine(Some(HireAndTermination), Some(Hire)),
            Some(HireAndTermination)
        );
    }

    #[test]
    fn absent_numbers_never_identify_the_same_worker() {
        let a = IdentityFields {
            name: Some("ANA RUIZ MORALES".to_owned()),
            ..IdentityFields::default()
        };
        let b = a.clone();
        assert!(!a.same_worker(&b));

        let c = IdentityFields {
            national_id: Some("1 12345678Z".to_owned()),
            ..IdentityFields::default()
        };
        assert!(c.same_worker(&c.clone()));
    }

    #[test]
    fn signal_requires_status_and_date() {
        let header = EpisodeFields {
            status: Some(EpisodeStatus::Hire),
            ..EpisodeFields::default()
        };
        assert!(!header.is_signal());

        let line = EpisodeFields {
            hire_real_date: Some("10-05-2018".to_owned()),
            ..header
        };
        assert!(line.is_signal());
    }

    #[test]
    fn record_splits_back_into_identity_and_episode() {
        let identity = IdentityFields {
            affiliation_number: Some("12 345678901".to_owned()),
            national_id: None,
            name: Some("JUAN PEREZ GARCIA".to_owned()),
        };
        let episode = EpisodeFields {
            status: Some(EpisodeStatus::Hire),
            hire_real_date: Some("10-05-2018".to_owned()),
            ..EpisodeFields::default()
        };
        let record = EmployeeEpisode::new(&identity, episode.clone());
        assert_eq!(record.identity(), identity);
        assert_eq!(record.episode(), episode);
    }

    #[test]
    fn raw_row_keeps_column_order() {
        let row = RawRow::from_values(["a", "b"]);
        let cells: Vec<_> = row.cells().collect();
        assert_eq!(cells, vec![("col_0", Some("a")), ("col_1", Some("b"))]);
        assert_eq!(row.len(), 2);
        assert!(RawRow::new().is_empty());
    }
}
