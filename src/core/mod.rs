// src/core/mod.rs
//! Pure text machinery shared by the validators and the detection engine.
//! Nothing in here touches a page or the filesystem.

pub mod normalize;
pub mod era;
pub mod dates;
pub mod years;
pub mod weburl;

pub use dates::{DateCandidate, extract_date_candidates, most_recent_date_in_window};
pub use normalize::{clean_text, contains_ci, normalize_digits};
pub use years::{extract_years, latest_year};
