// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;

use super::consts::*;

/// Which subset of the eight features a run evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Full,
    /// Search, English version, sustainability menu.
    Primary,
    /// Everything except search and English version.
    Secondary,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self { Mode::Full => "full", Mode::Primary => "primary", Mode::Secondary => "secondary" }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Full => "8項目完全版",
            Mode::Primary => "一次予選",
            Mode::Secondary => "二次予選",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputStyle {
    #[default]
    Detailed,
    /// Two-feature summary, one row per URL.
    Compact,
}

/// Settle delays after page actions. Heuristics only; tests zero them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    pub after_follow: Duration,
    pub after_icon_click: Duration,
    pub after_trigger_click: Duration,
    pub after_type: Duration,
    pub after_submit: Duration,
    pub between_urls: Duration,
    pub poll_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            after_follow: Duration::from_millis(1000),
            after_icon_click: Duration::from_millis(1000),
            after_trigger_click: Duration::from_millis(2000),
            after_type: Duration::from_millis(500),
            after_submit: Duration::from_millis(2000),
            between_urls: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl Timing {
    pub fn instant() -> Self {
        Self {
            after_follow: Duration::ZERO,
            after_icon_click: Duration::ZERO,
            after_trigger_click: Duration::ZERO,
            after_type: Duration::ZERO,
            after_submit: Duration::ZERO,
            between_urls: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyOptions {
    pub file: PathBuf,
    /// `None` until `with_defaults` picks a timestamped name.
    pub output: Option<PathBuf>,
    /// Fixed fallback sleep when the dynamic wait times out.
    pub wait_ms: u64,
    pub mode: Mode,
    pub output_style: OutputStyle,
    pub dry_run: bool,
    pub keywords_path: PathBuf,
    pub log_dir: PathBuf,
    pub headless: bool,
    pub timing: Timing,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_URL_FILE),
            output: None,
            wait_ms: DEFAULT_WAIT_MS,
            mode: Mode::Full,
            output_style: OutputStyle::Detailed,
            dry_run: false,
            keywords_path: PathBuf::from(DEFAULT_KEYWORDS_PATH),
            log_dir: PathBuf::from(LOG_DIR),
            headless: true,
            timing: Timing::default(),
        }
    }
}

impl SurveyOptions {
    /// Upper bound of the dynamic wait for search elements.
    pub fn dynamic_wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms.max(DYNAMIC_WAIT_FLOOR_MS))
    }

    pub fn fallback_wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    /// Fill the output name if the caller left it empty.
    pub fn with_defaults(mut self, now: NaiveDateTime) -> Self {
        if self.output.is_none() {
            self.output = Some(PathBuf::from(OUTPUT_DIR).join(default_output_name(
                self.mode,
                self.output_style,
                now,
            )));
        }
        self
    }
}

/// `<YYYYMMDD>_<HHMMSS>_IR調査結果_<label>_<details|summary>.csv`
pub fn default_output_name(mode: Mode, style: OutputStyle, now: NaiveDateTime) -> String {
    let (label, suffix) = match style {
        OutputStyle::Compact => ("compact", "summary"),
        OutputStyle::Detailed => (mode.label(), "details"),
    };
    format!("{}_IR調査結果_{}_{}.csv", now.format("%Y%m%d_%H%M%S"), label, suffix)
}
