// src/validators/message.rs
//! Recency-gated disclosure message (CEO message page).
//!
//! Valid only when the page names the message (a configured keyword) AND
//! carries a date inside `[window_start, today]`. The two failure shapes are
//! kept apart: a page with the keyword but only stale dates is not the same
//! finding as a page without the keyword.

use chrono::NaiveDate;

use super::first_keyword;
use crate::core::clean_text;
use crate::core::dates::find_most_recent_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEvaluation {
    pub matched_keyword: Option<String>,
    pub recent_date: Option<NaiveDate>,
}

impl MessageEvaluation {
    pub fn is_valid(&self) -> bool {
        self.matched_keyword.is_some() && self.recent_date.is_some()
    }

    pub fn has_keyword(&self) -> bool {
        self.matched_keyword.is_some()
    }

    /// Short rationale for the evidence note.
    pub fn reason(&self) -> String {
        match (&self.matched_keyword, self.recent_date) {
            (Some(k), Some(d)) => format!("「{k}」と{}の日付を確認", d.format("%Y-%m-%d")),
            (Some(k), None) => format!("「{k}」はあるが対象期間内の日付なし"),
            (None, _) => "キーワードなし".to_string(),
        }
    }
}

pub fn evaluate_top_message(
    text: &str,
    keywords: &[String],
    window_start: NaiveDate,
    today: NaiveDate,
) -> MessageEvaluation {
    let cleaned = clean_text(text);
    let Some(keyword) = first_keyword(&cleaned, keywords) else {
        return MessageEvaluation { matched_keyword: None, recent_date: None };
    };
    MessageEvaluation {
        matched_keyword: Some(keyword.clone()),
        recent_date: find_most_recent_date(&cleaned, window_start, today),
    }
}
