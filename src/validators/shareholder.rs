// src/validators/shareholder.rs
//! Shareholder return / benefit page check.
//!
//! Pages that are nothing but dividend tables carry no narrative; once digits
//! and number punctuation are removed too little text is left, and the page
//! is rejected before keyword matching.

use super::first_keyword;
use crate::core::clean_text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareholderEvaluation {
    /// Character count left after stripping digits and `.,%％`.
    pub narrative_len: usize,
    pub minimum_len: usize,
    pub matched_keyword: Option<String>,
}

impl ShareholderEvaluation {
    pub fn has_narrative(&self) -> bool {
        self.narrative_len >= self.minimum_len
    }

    pub fn is_valid(&self) -> bool {
        self.has_narrative() && self.matched_keyword.is_some()
    }

    pub fn reason(&self) -> String {
        if !self.has_narrative() {
            return format!("本文が短すぎる（{}文字 < {}文字）", self.narrative_len, self.minimum_len);
        }
        match &self.matched_keyword {
            Some(k) => format!("「{k}」を確認"),
            None => "キーワードなし".to_string(),
        }
    }
}

pub fn evaluate_shareholder_content(
    text: &str,
    keywords: &[String],
    minimum_len: usize,
) -> ShareholderEvaluation {
    let cleaned = clean_text(text);
    let narrative_len = cleaned
        .chars()
        .filter(|c| !c.is_ascii_digit() && !matches!(c, '.' | ',' | '%' | '％'))
        .count();
    let matched_keyword = if narrative_len >= minimum_len {
        first_keyword(&cleaned, keywords).cloned()
    } else {
        None
    };
    ShareholderEvaluation { narrative_len, minimum_len, matched_keyword }
}
