// src/validators/profile.rs
//! CEO biography check: career wording alone suffices; otherwise the page
//! must name the CEO role and match one of the configured year patterns.

use regex::RegexBuilder;

use super::first_keyword;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileEvaluation {
    pub career_keyword: Option<String>,
    pub ceo_keyword: Option<String>,
    pub year_pattern: Option<String>,
}

impl ProfileEvaluation {
    pub fn is_valid(&self) -> bool {
        self.career_keyword.is_some() || (self.ceo_keyword.is_some() && self.year_pattern.is_some())
    }

    pub fn reason(&self) -> String {
        if let Some(k) = &self.career_keyword {
            return format!("「{k}」を確認");
        }
        match (&self.ceo_keyword, &self.year_pattern) {
            (Some(k), Some(_)) => format!("「{k}」と年表記を確認"),
            (Some(k), None) => format!("「{k}」はあるが年表記なし"),
            (None, _) => "経歴の記載なし".to_string(),
        }
    }
}

/// Case-insensitive regex match; a pattern that does not compile is searched for literally.
fn pattern_matches(text: &str, pattern: &str) -> bool {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(text),
        Err(_) => text.contains(pattern),
    }
}

pub fn evaluate_profile(
    text: &str,
    career_keywords: &[String],
    ceo_keywords: &[String],
    year_patterns: &[String],
) -> ProfileEvaluation {
    ProfileEvaluation {
        career_keyword: first_keyword(text, career_keywords).cloned(),
        ceo_keyword: first_keyword(text, ceo_keywords).cloned(),
        year_pattern: year_patterns.iter().find(|p| !p.is_empty() && pattern_matches(text, p)).cloned(),
    }
}
