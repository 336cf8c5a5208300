// src/log.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Keeps the file writer alive; drop it last so buffered lines are flushed.
pub struct LogHandle {
    pub path: PathBuf,
    _guard: WorkerGuard,
}

/// Install the global subscriber: full log to `<dir>/<YYYYMMDDTHHMMSS>_ir-survey.log`,
/// warnings and errors mirrored to stderr. Level comes from `RUST_LOG` (default `info`).
pub fn init(dir: &Path) -> io::Result<LogHandle> {
    fs::create_dir_all(dir)?;
    let name = format!("{}_ir-survey.log", Local::now().format("%Y%m%dT%H%M%S"));
    let path = dir.join(&name);

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, &name));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .with(fmt::layer().with_writer(io::stderr).with_target(false).with_filter(LevelFilter::WARN))
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(LogHandle { path, _guard: guard })
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
