// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by a page implementation.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("navigation to {url} failed: {details}")]
    Navigation { url: String, details: String },
    #[error("timed out after {ms}ms: {what}")]
    Timeout { what: String, ms: u64 },
    #[error("in-page evaluation failed: {0}")]
    Evaluation(String),
    #[error("no element matches '{0}'")]
    NotFound(String),
    #[error("browser error: {0}")]
    Browser(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("keyword configuration not found at {0} (a keyword file is required)")]
    Missing(PathBuf),
    #[error("cannot read keyword configuration {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("malformed keyword configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid keyword configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum UrlListError {
    #[error("URL file not found: {0}")]
    Missing(PathBuf),
    #[error("cannot read URL file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("unsupported URL file format: {0}")]
    UnsupportedFormat(String),
    #[error("JSON URL file must contain an array under \"urls\"")]
    MissingUrlsArray,
    #[error("malformed JSON URL file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A URL-level failure: the orchestrating loop records it and moves on.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Page(#[from] PageError),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    UrlList(#[from] UrlListError),
    #[error("no URLs found in {0}")]
    NoUrls(PathBuf),
    #[error("browser could not be started: {0}")]
    Browser(#[from] PageError),
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid arguments: {0}")]
    Args(String),
}
