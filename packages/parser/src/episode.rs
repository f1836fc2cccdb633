//! Episode extraction: status keyword, dates and the trailing coded fields.
//!
//! A hire line reads
//!
//! ```text
//! ALTA <real> <effective> G.C/M T.C. [C.T.P.] TIPOS IMS TOTAL DIAS [CLV]
//! ```
//!
//! and a termination line repeats the hire dates before its own:
//!
//! ```text
//! BAJA <hire real> <hire effective> <real> <effective> G.C/M T.C. ...
//! ```
//!
//! The part-time column (`C.T.P.`) is only printed for partial schedules,
//! which shifts every later column. The trailing group is therefore located
//! by its first field, the `TIPOS` rate, which always has the `d,dd` shape.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use vida_laboral_episode_models::{EpisodeFields, EpisodeStatus, FULL_TIME_PERCENTAGE};

const HIRE_KEYWORD: &str = "ALTA";
const TERMINATION_KEYWORD: &str = "BAJA";

/// `ALTA` followed by its two dates.
static HIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bALTA\s+(\d{2}-\d{2}-\d{4})\s+(\d{2}-\d{2}-\d{4})").expect("valid regex")
});

/// `BAJA` followed by the repeated hire dates and its own two dates.
static TERMINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bBAJA\s+(\d{2}-\d{2}-\d{4})\s+(\d{2}-\d{2}-\d{4})\s+(\d{2}-\d{2}-\d{4})\s+(\d{2}-\d{2}-\d{4})",
    )
    .expect("valid regex")
});

/// The `TIPOS AT/IT` rate that anchors the trailing group.
static PIVOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+,\d{2}$").expect("valid regex"));

static PART_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{3,4}|0,\d{3})$").expect("valid regex"));

static SHORT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,4}$").expect("valid regex"));

/// Group, contract type and the four fields of the trailing group.
const MIN_TAIL_TOKENS: usize = 6;

/// Fields in the trailing group starting at the pivot.
const PIVOT_GROUP_LEN: usize = 4;

/// Which trailing tokens count as a situation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodePolicy {
    /// Hire tails: a single 2–4 character alphanumeric token.
    AnyAlphanumeric,
    /// Termination tails: 2–4 character tokens containing a letter, possibly
    /// several. Purely numeric tokens are data.
    RequiresLetter,
}

impl CodePolicy {
    fn is_code(self, token: &str) -> bool {
        SHORT_CODE_RE.is_match(token)
            && match self {
                Self::AnyAlphanumeric => true,
                Self::RequiresLetter => token.bytes().any(|b| b.is_ascii_uppercase()),
            }
    }
}

/// Extracts status, dates and coded fields from a normalized line.
///
/// Lines without an exact `ALTA`/`BAJA` token yield an empty
/// [`EpisodeFields`].
#[must_use]
pub fn extract_episode(line: &str) -> EpisodeFields {
    let has_hire = line.split_whitespace().any(|t| t == HIRE_KEYWORD);
    let has_termination = line.split_whitespace().any(|t| t == TERMINATION_KEYWORD);

    match (has_hire, has_termination) {
        (false, false) => EpisodeFields::default(),
        (true, false) => extract_hire(line),
        (false, true) => extract_termination(line),
        (true, true) => extract_combined(line),
    }
}

fn extract_hire(line: &str) -> EpisodeFields {
    let mut fields = EpisodeFields {
        status: Some(EpisodeStatus::Hire),
        ..EpisodeFields::default()
    };

    if let Some(caps) = HIRE_RE.captures(line) {
        fields.hire_real_date = group(&caps, 1);
        fields.hire_effective_date = group(&caps, 2);
        apply_tail(&mut fields, &line[caps_end(&caps)..], CodePolicy::AnyAlphanumeric);
    }

    fields
}

fn extract_termination(line: &str) -> EpisodeFields {
    let mut fields = EpisodeFields {
        status: Some(EpisodeStatus::Termination),
        ..EpisodeFields::default()
    };

    if let Some(caps) = TERMINATION_RE.captures_iter(line).last() {
        fields.hire_real_date = group(&caps, 1);
        fields.hire_effective_date = group(&caps, 2);
        fields.termination_real_date = group(&caps, 3);
        fields.termination_effective_date = group(&caps, 4);
        apply_tail(&mut fields, &line[caps_end(&caps)..], CodePolicy::RequiresLetter);
    }

    fields
}

/// A line holding both events. Only the last `BAJA` group is the worker's
/// final status; earlier groups are superseded terminations.
fn extract_combined(line: &str) -> EpisodeFields {
    let mut fields = EpisodeFields {
        status: Some(EpisodeStatus::HireAndTermination),
        ..EpisodeFields::default()
    };

    if let Some(caps) = HIRE_RE.captures(line) {
        fields.hire_real_date = group(&caps, 1);
        fields.hire_effective_date = group(&caps, 2);
    }

    if let Some(caps) = TERMINATION_RE.captures_iter(line).last() {
        if fields.hire_real_date.is_none() {
            fields.hire_real_date = group(&caps, 1);
            fields.hire_effective_date = group(&caps, 2);
        }
        fields.termination_real_date = group(&caps, 3);
        fields.termination_effective_date = group(&caps, 4);
        apply_tail(&mut fields, &line[caps_end(&caps)..], CodePolicy::RequiresLetter);
    }

    fields
}

fn group(caps: &Captures<'_>, i: usize) -> Option<String> {
    caps.get(i).map(|m| m.as_str().to_owned())
}

fn caps_end(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(0, |m| m.end())
}

/// Index of the pivot rate, if it sits after group and contract type.
fn pivot_index(tokens: &[&str]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| PIVOT_RE.is_match(t))
        .filter(|&i| i >= 2)
}

/// Splits trailing situation codes off `tokens`.
///
/// Tokens inside the pivot-anchored group are data even when they look like
/// a code (e.g. a four-digit day count).
fn strip_codes<'a>(tokens: &'a [&'a str], policy: CodePolicy) -> (&'a [&'a str], Option<String>) {
    let protected = pivot_index(tokens).map_or(0, |p| p + PIVOT_GROUP_LEN);
    let mut end = tokens.len();
    let mut code = None;

    while end >= 2 && end > protected && policy.is_code(tokens[end - 1]) {
        if code.is_none() {
            code = Some(tokens[end - 1].to_owned());
        }
        end -= 1;
        if policy == CodePolicy::AnyAlphanumeric {
            break;
        }
    }

    (&tokens[..end], code)
}

/// Assigns the coded fields that follow the date group.
fn apply_tail(fields: &mut EpisodeFields, tail: &str, policy: CodePolicy) {
    let tokens: Vec<&str> = tail.split_whitespace().collect();
    let (data, code) = strip_codes(&tokens, policy);
    fields.situation_code = code;

    if data.len() < MIN_TAIL_TOKENS {
        return;
    }

    let owned = |i: usize| data.get(i).map(|t| (*t).to_owned());

    fields.contribution_group = data[0]
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| data[0].to_owned());
    fields.contract_type = owned(1);

    let start = if let Some(pivot) = pivot_index(data) {
        let part_time = if pivot == 3 && PART_TIME_RE.is_match(data[2]) {
            data[2]
        } else {
            FULL_TIME_PERCENTAGE
        };
        fields.part_time_percentage = Some(part_time.to_owned());
        pivot
    } else {
        fields.part_time_percentage = Some(FULL_TIME_PERCENTAGE.to_owned());
        data.len() - PIVOT_GROUP_LEN
    };

    fields.rate = owned(start);
    fields.base_amount = owned(start + 1);
    fields.total = owned(start + 2);
    fields.days_contributed = owned(start + 3);
}
