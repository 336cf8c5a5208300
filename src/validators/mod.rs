// src/validators/mod.rs
//! # Content validators
//!
//! Pure judgments over text (and link lists) already pulled off a page. Each
//! validator returns a small evaluation struct carrying both the verdict and
//! the evidence behind it, so the caller can write an auditable note.
//!
//! ## What lives here
//! - Recency-gated message check (keyword + dated within a window).
//! - Biography check (career wording, or CEO wording plus a year pattern).
//! - Integrated-report link selection (keyword, document type, year, rank).
//! - Financial recency (visual present + recent fiscal year).
//! - Shareholder narrative check (numeric tables rejected).
//! - Not-found page heuristics.
//!
//! ## What does **not** live here
//! - Page access, clicking, navigation. The engine feeds these functions.
//! - Configuration loading. Thresholds and keyword lists arrive as arguments.

pub mod message;
pub mod profile;
pub mod report;
pub mod financial;
pub mod shareholder;
pub mod not_found;

pub use financial::{FinancialEvaluation, evaluate_financial_recency, evaluate_financial_text};
pub use message::{MessageEvaluation, evaluate_top_message};
pub use not_found::looks_not_found;
pub use profile::{ProfileEvaluation, evaluate_profile};
pub use report::{LinkCandidate, ReportCriteria, select_integrated_report_link};
pub use shareholder::{ShareholderEvaluation, evaluate_shareholder_content};

/// First keyword (in list order) contained in `text`. Case-sensitive; empty keywords skipped.
pub(crate) fn first_keyword<'k>(text: &str, keywords: &'k [String]) -> Option<&'k String> {
    keywords.iter().find(|k| !k.is_empty() && text.contains(k.as_str()))
}
