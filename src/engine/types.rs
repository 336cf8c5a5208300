// src/engine/types.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Mode;

/* ---------------- Features ---------------- */

/// The eight disclosure features, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Feature {
    Search,
    English,
    TopMessage,
    Profile,
    IntegratedReport,
    FinancialGraph,
    ShareholderReturn,
    Sustainability,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::Search,
        Feature::English,
        Feature::TopMessage,
        Feature::Profile,
        Feature::IntegratedReport,
        Feature::FinancialGraph,
        Feature::ShareholderReturn,
        Feature::Sustainability,
    ];

    /// Row label in the detailed report.
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Search => "サイト内検索がある",
            Feature::English => "IR英語版サイトがある",
            Feature::TopMessage => "社長メッセージの掲載がある",
            Feature::Profile => "社長の経歴の掲載がある",
            Feature::IntegratedReport => "統合報告書(PDF)の掲載がある",
            Feature::FinancialGraph => "財務情報をグラフで掲載している",
            Feature::ShareholderReturn => "株主還元もしくは株主優待について掲載がある",
            Feature::Sustainability => {
                "グローバルメニューに「サステナビリティ」「ESG」「CSR」相当のメニューがある"
            }
        }
    }

    /// Prefix for evidence notes and status lines.
    pub fn short(&self) -> &'static str {
        match self {
            Feature::Search => "サイト内検索",
            Feature::English => "英語版サイト",
            Feature::TopMessage => "社長メッセージ",
            Feature::Profile => "社長経歴",
            Feature::IntegratedReport => "統合報告書",
            Feature::FinancialGraph => "財務グラフ",
            Feature::ShareholderReturn => "株主還元・優待",
            Feature::Sustainability => "サステナビリティメニュー",
        }
    }

    /// Is this feature evaluated in `mode`?
    pub fn in_mode(&self, mode: Mode) -> bool {
        match mode {
            Mode::Full => true,
            Mode::Primary => matches!(self, Feature::Search | Feature::English | Feature::Sustainability),
            Mode::Secondary => !matches!(self, Feature::Search | Feature::English),
        }
    }
}

/* ---------------- Detection metadata ---------------- */

/// Which detection strategy established the site-search capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DetectionKind {
    SearchElement,
    FormElement,
    SearchIcon,
    ShadowDom,
    HiddenElement,
    ClickableElement,
    SpecificPattern,
    AdvancedForm,
    ImageButton,
}

impl DetectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionKind::SearchElement => "search-element",
            DetectionKind::FormElement => "form-element",
            DetectionKind::SearchIcon => "search-icon",
            DetectionKind::ShadowDom => "shadow-dom",
            DetectionKind::HiddenElement => "hidden-element",
            DetectionKind::ClickableElement => "clickable-element",
            DetectionKind::SpecificPattern => "specific-pattern",
            DetectionKind::AdvancedForm => "advanced-form",
            DetectionKind::ImageButton => "image-button",
        }
    }
}

/* ---------------- Evidence ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EvidenceItem {
    /// 0 or 1.
    pub value: u8,
    pub hit_url: String,
    pub note: String,
    pub detected_selector: String,
    pub detected_element_type: String,
}

impl EvidenceItem {
    pub fn found(hit_url: impl Into<String>, note: impl Into<String>) -> Self {
        Self { value: 1, hit_url: hit_url.into(), note: note.into(), ..Default::default() }
    }

    pub fn missing(note: impl Into<String>) -> Self {
        Self { note: note.into(), ..Default::default() }
    }

    pub fn with_detection(mut self, selector: impl Into<String>, kind: DetectionKind) -> Self {
        self.detected_selector = selector.into();
        self.detected_element_type = kind.as_str().to_string();
        self
    }

    pub fn is_found(&self) -> bool {
        self.value == 1
    }
}

/// Everything learned about one URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SurveyResult {
    pub url: String,
    pub actual_url: String,
    pub items: BTreeMap<Feature, EvidenceItem>,
    pub error: Option<String>,
    #[serde(skip)]
    pub mode: Mode,
}

impl SurveyResult {
    pub fn new(url: impl Into<String>, mode: Mode) -> Self {
        let url = url.into();
        Self {
            actual_url: url.clone(),
            url,
            items: Feature::ALL.iter().map(|f| (*f, EvidenceItem::default())).collect(),
            error: None,
            mode,
        }
    }

    /// URL-level failure: every feature is 0 and carries the error text.
    pub fn failed(url: impl Into<String>, mode: Mode, message: &str) -> Self {
        let mut r = Self::new(url, mode);
        for item in r.items.values_mut() {
            item.note = message.to_string();
        }
        r.error = Some(message.to_string());
        r
    }

    pub fn item(&self, feature: Feature) -> &EvidenceItem {
        // every feature is inserted by `new`
        static EMPTY: EvidenceItem = EvidenceItem {
            value: 0,
            hit_url: String::new(),
            note: String::new(),
            detected_selector: String::new(),
            detected_element_type: String::new(),
        };
        self.items.get(&feature).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, feature: Feature, item: EvidenceItem) {
        self.items.insert(feature, item);
    }

    pub fn value(&self, feature: Feature) -> u8 {
        self.item(feature).value
    }

    /// Features evaluated so far without a note. Empty once a survey step completes.
    pub fn unexplained(&self) -> Vec<Feature> {
        self.items.iter().filter(|(_, i)| i.note.is_empty()).map(|(f, _)| *f).collect()
    }
}
