// src/validators/report.rs
//! Integrated report link selection.
//!
//! Per link, in this order: keyword present -> document-type indicator
//! present -> newest year >= `min_year`. Survivors are ranked by newest year;
//! on a tie the earlier link wins.

use crate::core::{clean_text, latest_year};
use crate::page::Link;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkCandidate {
    pub href: String,
    pub text: String,
    pub latest_year: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct ReportCriteria<'a> {
    pub min_year: i32,
    pub keywords: &'a [String],
    /// Tokens such as `.pdf`, matched case-insensitively against href or text.
    pub indicators: &'a [String],
}

fn qualify(link: &Link, criteria: &ReportCriteria<'_>) -> Option<LinkCandidate> {
    let combined = clean_text(&format!("{} {}", link.text, link.href));
    if combined.is_empty() {
        return None;
    }
    if !criteria.keywords.iter().any(|k| !k.is_empty() && combined.contains(k.as_str())) {
        return None;
    }

    let href = link.href.to_lowercase();
    let text = link.text.to_lowercase();
    let is_document = criteria
        .indicators
        .iter()
        .map(|i| i.to_lowercase())
        .any(|i| !i.is_empty() && (href.contains(&i) || text.contains(&i)));
    if !is_document {
        return None;
    }

    let year = latest_year(&combined)?;
    if year < criteria.min_year {
        return None;
    }
    Some(LinkCandidate { href: link.href.clone(), text: link.text.clone(), latest_year: year })
}

pub fn select_integrated_report_link(links: &[Link], criteria: &ReportCriteria<'_>) -> Option<LinkCandidate> {
    let mut best: Option<LinkCandidate> = None;
    for candidate in links.iter().filter_map(|l| qualify(l, criteria)) {
        if best.as_ref().is_none_or(|b| candidate.latest_year > b.latest_year) {
            best = Some(candidate);
        }
    }
    best
}
