//! Worker identity extraction.
//!
//! An identity row carries the affiliation number and/or the national ID of
//! a worker, usually followed by their name. Table backends frequently glue
//! neighbouring column fragments (a DNI check letter, a situation code) onto
//! the name, so the name is cleaned before being accepted.

use std::sync::LazyLock;

use regex::Regex;
use vida_laboral_episode_models::IdentityFields;

/// Affiliation number: two-digit province group and a 9–10 digit number.
static AFFILIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}\s+\d{9,10}").expect("valid regex"));

/// National ID: document-type digit, 8–9 digits and the check letter.
static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\s+\d{8,9}[A-Z]").expect("valid regex"));

/// Upper-case runs long enough to hold a full name.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-ZÁÉÍÓÚÑ][A-ZÁÉÍÓÚÑ\s]{8,60}").expect("valid regex"));

/// Short alphanumeric codes printed in the situation column.
static SHORT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,4}$").expect("valid regex"));

/// A single upper-case word of a name.
static NAME_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZÁÉÍÓÚÑ]+$").expect("valid regex"));

/// Four or more digits: a day count or an amount, never a situation code.
static LONG_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,}$").expect("valid regex"));

const MIN_NAME_CHARS: usize = 10;
const MIN_NAME_WORDS: usize = 2;

/// Extracts the worker identity from a normalized line.
///
/// Returns `None` unless an affiliation number or a national ID is found.
/// The name is only searched for on identity lines and may still be `None`.
#[must_use]
pub fn extract_identity(line: &str) -> Option<IdentityFields> {
    let affiliation_number = AFFILIATION_RE.find(line).map(|m| m.as_str().to_owned());
    let national_id = NATIONAL_ID_RE.find(line).map(|m| m.as_str().to_owned());

    if affiliation_number.is_none() && national_id.is_none() {
        return None;
    }

    let name = extract_name(line, national_id.as_deref());

    Some(IdentityFields {
        affiliation_number,
        national_id,
        name,
    })
}

/// Extracts a person name from `line`.
///
/// When `national_id` is given and the line starts with its check letter,
/// that letter is a fragment of the ID column and is dropped first.
#[must_use]
pub fn extract_name(line: &str, national_id: Option<&str>) -> Option<String> {
    let mut text = line.trim();

    if let Some(letter) = national_id.and_then(|id| id.chars().last())
        && let Some(rest) = text
            .strip_prefix(letter)
            .and_then(|rest| rest.strip_prefix(' '))
    {
        text = rest.trim_start();
    }

    NAME_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|candidate| is_name_candidate(candidate))
        .find_map(clean_name)
}

/// Extracts a name from a row holding nothing but a name, optionally
/// followed by a situation code.
///
/// Unlike [`extract_name`], any other text on the row (dates, digits,
/// lower-case words, punctuation) rejects it, so page and column headers
/// are not mistaken for a wrapped name.
#[must_use]
pub fn extract_name_row(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (last, words) = tokens.split_last()?;

    if !words.iter().all(|w| NAME_WORD_RE.is_match(w))
        || (!NAME_WORD_RE.is_match(last) && !SHORT_CODE_RE.is_match(last))
    {
        return None;
    }

    let text = tokens.join(" ");
    if !is_name_candidate(&text) {
        return None;
    }
    clean_name(&text)
}

/// Extracts the situation code (`CLV`) printed at the end of a worker's
/// identity row: a final 2–4 character alphanumeric token that is not a
/// four-digit number.
#[must_use]
pub fn extract_situation_code(line: &str) -> Option<String> {
    line.split_whitespace()
        .next_back()
        .filter(|t| SHORT_CODE_RE.is_match(t) && !LONG_NUMBER_RE.is_match(t))
        .map(str::to_owned)
}

fn is_name_candidate(candidate: &str) -> bool {
    candidate.split_whitespace().count() >= MIN_NAME_WORDS
        && !candidate.starts_with(|c: char| c.is_ascii_digit())
        && !SHORT_CODE_RE.is_match(candidate)
        && candidate.chars().count() >= MIN_NAME_CHARS
}

/// Strips a leading single-letter token, a trailing short code and
/// trailing single-letter tokens.
fn clean_name(candidate: &str) -> Option<String> {
    let mut words: Vec<&str> = candidate.split_whitespace().collect();

    if words.len() > 1 && is_single_ascii_upper(words[0]) {
        words.remove(0);
    }

    if words.len() > 1 && words.last().is_some_and(|w| SHORT_CODE_RE.is_match(w)) {
        words.pop();
    }

    while words.len() >= 3 && words.last().is_some_and(|w| is_single_upper(w)) {
        words.pop();
    }

    let name = words.join(" ");
    (words.len() >= MIN_NAME_WORDS && name.chars().count() >= MIN_NAME_CHARS).then_some(name)
}

fn is_single_ascii_upper(word: &str) -> bool {
    word.len() == 1 && word.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_single_upper(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}
