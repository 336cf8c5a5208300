// src/validators/not_found.rs
//! Soft-404 detection from title, body text and the first heading.

use crate::config::consts::{NOT_FOUND_BODY_MARKERS, NOT_FOUND_TITLE_MARKERS};

pub fn looks_not_found(title: &str, body: &str, first_heading: Option<&str>) -> bool {
    NOT_FOUND_TITLE_MARKERS.iter().any(|m| title.contains(m))
        || NOT_FOUND_BODY_MARKERS.iter().any(|m| body.contains(m))
        || first_heading.is_some_and(|h| h.contains("404"))
}
