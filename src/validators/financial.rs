// src/validators/financial.rs
//! Financial chart recency: a chart-like visual on the page plus a fiscal
//! year at or after the minimum year.

use crate::core::{clean_text, latest_year};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinancialText {
    pub latest_year: Option<i32>,
    pub has_recent_year: bool,
}

pub fn evaluate_financial_text(text: &str, min_year: i32) -> FinancialText {
    let latest = latest_year(&clean_text(text));
    FinancialText {
        latest_year: latest,
        has_recent_year: latest.is_some_and(|y| y >= min_year),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinancialEvaluation {
    pub has_visual: bool,
    pub latest_year: Option<i32>,
    pub min_year: i32,
}

impl FinancialEvaluation {
    pub fn is_valid(&self) -> bool {
        self.has_visual && self.latest_year.is_some_and(|y| y >= self.min_year)
    }

    pub fn reason(&self) -> String {
        match (self.has_visual, self.latest_year) {
            (false, _) => "グラフ要素なし".to_string(),
            (true, None) => "年度表記なし".to_string(),
            (true, Some(y)) if y < self.min_year => format!("最新年度{y}が{}未満", self.min_year),
            (true, Some(y)) => format!("グラフと{y}年度を確認"),
        }
    }
}

pub fn evaluate_financial_recency(has_visual: bool, text: &str, min_year: i32) -> FinancialEvaluation {
    let t = evaluate_financial_text(text, min_year);
    FinancialEvaluation { has_visual, latest_year: t.latest_year, min_year }
}
