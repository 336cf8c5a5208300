// src/config/keywords.rs
//! Keyword/locator configuration (`config/keywords.json`).
//!
//! Everything the engine matches against comes from here: keyword lists,
//! locator expressions, exclusion lists, thresholds. The engine interprets
//! this data with fixed code; nothing in the file is executable.
//!
//! There is deliberately no built-in fallback. A missing file, a missing
//! section or an empty required list aborts the run before any browser starts.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::consts::DEFAULT_MIN_SHAREHOLDER_TEXT;
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keywords {
    pub search: SearchKeywords,
    pub english: EnglishKeywords,
    pub sustainability: SustainabilityKeywords,
    pub top_message: TopMessageKeywords,
    pub officer: LinkPatterns,
    pub profile: ProfileKeywords,
    pub integrated_report: ReportKeywords,
    pub financial: LinkPatterns,
    pub graph: GraphKeywords,
    pub stock: StockKeywords,
}

/// Locator lists for the site-search detection chain. All optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchKeywords {
    pub selectors: Vec<String>,
    pub form_selectors: Vec<String>,
    pub icon_selectors: Vec<String>,
    pub modal_selectors: Vec<String>,
    pub input_selectors: Vec<String>,
    pub trigger_texts: Vec<String>,
    pub specific_patterns: Vec<String>,
    pub hidden_indicators: Vec<String>,
    pub exclude_selectors: Vec<String>,
    pub submit_selectors: Vec<String>,
}

/// How to spot a feature's link on the origin page: anchor text or href fragments.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatterns {
    pub text_patterns: Vec<String>,
    pub url_patterns: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnglishKeywords {
    /// Locators such as `a[href*="/en/"]`.
    pub url_patterns: Vec<String>,
    /// Upper-case anchor texts such as `ENGLISH`.
    pub text_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_domains: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityKeywords {
    pub menu_keywords: Vec<String>,
    pub selectors: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMessageKeywords {
    #[serde(flatten)]
    pub link: LinkPatterns,
    pub content_keywords: Vec<String>,
    #[serde(default)]
    pub min_content_length: usize,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileKeywords {
    pub career_keywords: Vec<String>,
    pub ceo_keywords: Vec<String>,
    /// Regular expressions (case-insensitive); invalid ones degrade to substring search.
    #[serde(default)]
    pub year_patterns: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportKeywords {
    #[serde(flatten)]
    pub link: LinkPatterns,
    #[serde(default)]
    pub report_keywords: Vec<String>,
    pub pdf_indicators: Vec<String>,
    /// Oldest acceptable report year; previous calendar year when absent.
    #[serde(default)]
    pub min_year: Option<i32>,
}

impl ReportKeywords {
    /// `textPatterns ∪ reportKeywords`, order kept, duplicates dropped.
    pub fn all_keywords(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for k in self.link.text_patterns.iter().chain(&self.report_keywords) {
            if !out.contains(k) { out.push(k.clone()); }
        }
        out
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphKeywords {
    pub selectors: Vec<String>,
    #[serde(default)]
    pub image_alt_keywords: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockKeywords {
    #[serde(flatten)]
    pub link: LinkPatterns,
    #[serde(default)]
    pub exclude_urls: Vec<String>,
    pub content_keywords: Vec<String>,
    #[serde(default = "default_min_shareholder_text")]
    pub minimum_text_length: usize,
}

fn default_min_shareholder_text() -> usize { DEFAULT_MIN_SHAREHOLDER_TEXT }

impl Keywords {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let kw: Keywords = serde_json::from_str(text)?;
        kw.validate()?;
        Ok(kw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&str, &[String]); 11] = [
            ("english.urlPatterns", &self.english.url_patterns),
            ("english.textPatterns", &self.english.text_patterns),
            ("sustainability.menuKeywords", &self.sustainability.menu_keywords),
            ("sustainability.selectors", &self.sustainability.selectors),
            ("topMessage.contentKeywords", &self.top_message.content_keywords),
            ("profile.careerKeywords", &self.profile.career_keywords),
            ("integratedReport.pdfIndicators", &self.integrated_report.pdf_indicators),
            ("graph.selectors", &self.graph.selectors),
            ("stock.contentKeywords", &self.stock.content_keywords),
            ("officer.textPatterns", &self.officer.text_patterns),
            ("financial.textPatterns", &self.financial.text_patterns),
        ];
        for (name, list) in required {
            if list.iter().all(|s| s.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("{name} must list at least one entry")));
            }
        }
        if self.integrated_report.all_keywords().is_empty() {
            return Err(ConfigError::Invalid(
                "integratedReport needs textPatterns or reportKeywords".into(),
            ));
        }
        if self.stock.minimum_text_length == 0 {
            return Err(ConfigError::Invalid("stock.minimumTextLength must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../config/keywords.json");

    #[test]
    fn bundled_configuration_loads() {
        let kw = Keywords::from_json(SAMPLE).unwrap();
        assert!(!kw.search.selectors.is_empty());
        assert!(kw.top_message.content_keywords.iter().any(|k| k == "社長メッセージ"));
        assert_eq!(kw.stock.minimum_text_length, 15);
    }

    #[test]
    fn missing_section_is_fatal() {
        let mut v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        v.as_object_mut().unwrap().remove("stock");
        let err = Keywords::from_json(&v.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn empty_required_list_is_fatal() {
        let mut v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        v["topMessage"]["contentKeywords"] = serde_json::json!([]);
        let err = Keywords::from_json(&v.to_string()).unwrap_err();
        assert!(err.to_string().contains("topMessage.contentKeywords"));
    }

    #[test]
    fn search_lists_may_be_omitted() {
        let mut v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        v["search"] = serde_json::json!({});
        let kw = Keywords::from_json(&v.to_string()).unwrap();
        assert!(kw.search.selectors.is_empty());
    }

    #[test]
    fn absent_file_is_reported_with_its_path() {
        let err = Keywords::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn report_keywords_union_keeps_order() {
        let kw = Keywords::from_json(SAMPLE).unwrap();
        let all = kw.integrated_report.all_keywords();
        assert_eq!(all.first().map(String::as_str), Some("統合報告書"));
    }
}
