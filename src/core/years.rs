// src/core/years.rs
//! Bare fiscal-year references: `2024`, `FY2024`, `令和6年度`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::era::{ERA_ALTERNATION, era_to_gregorian};
use super::normalize::{ascii_bounded, normalize_digits};

static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"20[0-9]{2}").expect("static regex"));
static FISCAL_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FY\s*(20[0-9]{2})").expect("static regex"));
static ERA_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({ERA_ALTERNATION})\s*([0-9]{{1,2}})\s*年度?")).expect("static regex")
});

/// Distinct years found in `text`, ascending.
pub fn extract_years(text: &str) -> Vec<i32> {
    let normalized = normalize_digits(text);
    let t = normalized.as_str();
    let mut years = BTreeSet::new();

    for m in BARE_YEAR.find_iter(t) {
        if ascii_bounded(t, m.start(), m.end()) {
            if let Ok(y) = m.as_str().parse() { years.insert(y); }
        }
    }

    for caps in FISCAL_YEAR.captures_iter(t) {
        let (Some(whole), Some(y)) = (caps.get(0), caps.get(1)) else { continue };
        if !ascii_bounded(t, whole.start(), whole.end()) { continue; }
        if let Ok(y) = y.as_str().parse() { years.insert(y); }
    }

    for caps in ERA_YEAR.captures_iter(t) {
        let Ok(era_year) = caps[2].parse::<i32>() else { continue };
        if let Some(y) = era_to_gregorian(&caps[1], era_year) { years.insert(y); }
    }

    years.into_iter().collect()
}

/// Largest year in `text`, if any.
pub fn latest_year(text: &str) -> Option<i32> {
    extract_years(text).last().copied()
}
