// src/core/dates.rs
//! Calendar dates in the notations IR pages actually use:
//! `2024年9月10日`, `2024/9/10`, `令和6年9月1日`, `September 10, 2024`, `10 Sept. 2024`.
//! All notations are scanned independently and unioned, then deduplicated by day.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::era::{ERA_ALTERNATION, era_to_gregorian};
use super::normalize::{ascii_bounded, normalize_digits};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateCandidate {
    pub date: NaiveDate,
    /// Exact substring that produced `date`.
    pub source_text: String,
}

const MONTH_ALTERNATION: &str = "January|February|March|April|May|June|July|August|September|Sept\\.?|October|November|December|Jan\\.?|Feb\\.?|Mar\\.?|Apr\\.?|Jun\\.?|Jul\\.?|Aug\\.?|Sep\\.?|Oct\\.?|Nov\\.?|Dec\\.?";

static JP_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})\s*年\s*([0-9]{1,2})\s*月(?:\s*([0-9]{1,2})\s*日)?").expect("static regex")
});
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})[./-]([0-9]{1,2})(?:[./-]([0-9]{1,2}))?").expect("static regex")
});
static JP_ERA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({ERA_ALTERNATION})\s*([0-9]{{1,2}})\s*年\s*([0-9]{{1,2}})\s*月(?:\s*([0-9]{{1,2}})\s*日)?"
    ))
    .expect("static regex")
});
static EN_MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({MONTH_ALTERNATION})\s+([0-9]{{1,2}},\s*)?([0-9]{{4}})")).expect("static regex")
});
static EN_DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)([0-9]{{1,2}})\s+({MONTH_ALTERNATION})\s+([0-9]{{4}})")).expect("static regex")
});

/// English month name (any case, trailing '.' allowed) -> 1..=12.
pub fn month_from_name(name: &str) -> Option<u32> {
    let key = name.trim_end_matches('.').to_ascii_lowercase();
    let m = match key.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(m)
}

fn num<T: std::str::FromStr>(caps: &Captures, i: usize) -> Option<T> {
    caps.get(i).and_then(|m| m.as_str().trim_matches(|c: char| !c.is_ascii_digit()).parse().ok())
}

/// Month outside 1..=12 kills the match; a missing (or zero) day means the 1st.
/// Days that do not exist in the month are dropped rather than rolled over.
fn make_date(year: i32, month: u32, day: Option<u32>) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) { return None; }
    let day = day.filter(|d| *d > 0).unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every distinct date in `text`, first-seen order, tagged with its source substring.
pub fn extract_date_candidates(text: &str) -> Vec<DateCandidate> {
    let normalized = normalize_digits(text);
    let t = normalized.as_str();
    let mut out: Vec<DateCandidate> = Vec::new();

    let mut push = |date: Option<NaiveDate>, source: &str| {
        if let Some(date) = date {
            out.push(DateCandidate { date, source_text: source.to_string() });
        }
    };

    for caps in JP_LONG.captures_iter(t) {
        let (Some(y), Some(m)) = (num::<i32>(&caps, 1), num::<u32>(&caps, 2)) else { continue };
        push(make_date(y, m, num(&caps, 3)), &caps[0]);
    }

    for caps in NUMERIC.captures_iter(t) {
        let (Some(y), Some(m)) = (num::<i32>(&caps, 1), num::<u32>(&caps, 2)) else { continue };
        push(make_date(y, m, num(&caps, 3)), &caps[0]);
    }

    for caps in JP_ERA.captures_iter(t) {
        let Some(era_year) = num::<i32>(&caps, 2) else { continue };
        let Some(y) = era_to_gregorian(&caps[1], era_year) else { continue };
        let Some(m) = num::<u32>(&caps, 3) else { continue };
        push(make_date(y, m, num(&caps, 4)), &caps[0]);
    }

    for caps in EN_MONTH_FIRST.captures_iter(t) {
        let Some(whole) = caps.get(0) else { continue };
        if !ascii_bounded(t, whole.start(), whole.end()) { continue; }
        let Some(m) = month_from_name(&caps[1]) else { continue };
        let Some(y) = num::<i32>(&caps, 3) else { continue };
        push(make_date(y, m, num(&caps, 2)), whole.as_str());
    }

    for caps in EN_DAY_FIRST.captures_iter(t) {
        let Some(whole) = caps.get(0) else { continue };
        if !ascii_bounded(t, whole.start(), whole.end()) { continue; }
        let Some(m) = month_from_name(&caps[2]) else { continue };
        let Some(y) = num::<i32>(&caps, 3) else { continue };
        push(make_date(y, m, num(&caps, 1)), whole.as_str());
    }

    let mut seen = HashSet::new();
    out.retain(|c| seen.insert(c.date));
    out
}

/// Latest candidate with `lower <= date <= upper`, if any.
pub fn most_recent_date_in_window(
    candidates: &[DateCandidate],
    lower: NaiveDate,
    upper: NaiveDate,
) -> Option<NaiveDate> {
    candidates
        .iter()
        .map(|c| c.date)
        .filter(|d| *d >= lower && *d <= upper)
        .max()
}

/// Extract + window in one go.
pub fn find_most_recent_date(text: &str, lower: NaiveDate, upper: NaiveDate) -> Option<NaiveDate> {
    most_recent_date_in_window(&extract_date_candidates(text), lower, upper)
}
