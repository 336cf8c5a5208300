// src/config/clock.rs
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

use super::consts::FINANCIAL_YEAR_FLOOR;

/// Run-time reference captured once when the survey starts.
/// Thresholds derived from it are not re-evaluated per URL, so a batch that
/// crosses New Year keeps the thresholds it started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurveyClock {
    pub started_at: NaiveDateTime,
    /// Jan 1 of the previous calendar year.
    pub message_window_start: NaiveDate,
    /// `max(year - 1, 2000)`.
    pub financial_min_year: i32,
    pub previous_year: i32,
}

impl SurveyClock {
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    pub fn at(started_at: NaiveDateTime) -> Self {
        let previous_year = started_at.year() - 1;
        Self {
            started_at,
            message_window_start: NaiveDate::from_ymd_opt(previous_year, 1, 1)
                .unwrap_or(started_at.date()),
            financial_min_year: previous_year.max(FINANCIAL_YEAR_FLOOR),
            previous_year,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.started_at.date()
    }
}
