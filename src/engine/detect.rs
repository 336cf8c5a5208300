// src/engine/detect.rs
//! Site-search detection chain.
//!
//! Strategies run in a fixed order and the first one that yields a visible,
//! non-excluded match wins; nothing after it is queried.
//!
//! 1. direct locators (`search.selectors`)
//! 2. forms holding a visible search-like input (`search.formSelectors`)
//! 3. icons (`search.iconSelectors`), then click + modal input check
//! 4. advanced fallbacks: shadow roots, hidden inputs, trigger-text
//!    clickables, specific patterns, search-named form inputs, image buttons.
//!    A clickable or pattern hit is clicked and probed with a short query.
//!
//! A page error inside one strategy only costs that strategy.

use tokio::time::sleep;

use super::types::{DetectionKind, EvidenceItem};
use crate::config::consts::{PROBE_QUERY, SEARCH_RESULT_INDICATORS};
use crate::config::keywords::SearchKeywords;
use crate::config::Timing;
use crate::core::weburl::is_same_origin;
use crate::page::{ElementInfo, ElementQuery, Page};

const FORM_SEARCH_INPUTS: &str =
    r#"input[name="q"], input[type="text"], input[type="image"], input[type="search"]"#;
const CLICKABLE_TAGS: &str = "button, a, div, span, li";
const FORM_INPUTS: &str = "form input";
const IMAGE_INPUTS: &str = r#"input[type="image"]"#;

/* ---------------- Outcome types ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchHit {
    Direct { locator: String },
    Form { locator: String },
    Icon { locator: String },
    Advanced { kind: DetectionKind, count: usize, click_target: Option<String> },
}

impl SearchHit {
    pub fn kind(&self) -> DetectionKind {
        match self {
            SearchHit::Direct { .. } => DetectionKind::SearchElement,
            SearchHit::Form { .. } => DetectionKind::FormElement,
            SearchHit::Icon { .. } => DetectionKind::SearchIcon,
            SearchHit::Advanced { kind, .. } => *kind,
        }
    }

    /// Value of the "detected selector" column.
    pub fn selector(&self) -> String {
        match self {
            SearchHit::Direct { locator } | SearchHit::Form { locator } | SearchHit::Icon { locator } => {
                locator.clone()
            }
            SearchHit::Advanced { kind, .. } => join!("advanced-", kind.as_str()),
        }
    }
}

/// Result of clicking a search icon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IconFollowUp {
    /// Modal locator that matched after the click.
    pub modal_locator: Option<String>,
    pub url: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Button(String),
    Enter,
}

/// Result of clicking a trigger, typing the probe query and submitting it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub input_locator: Option<String>,
    pub submitted: Option<Submission>,
    pub results_confirmed: bool,
    pub url: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchDetection {
    pub hit: Option<SearchHit>,
    pub icon: Option<IconFollowUp>,
    pub probe: Option<ProbeOutcome>,
}

impl SearchDetection {
    pub fn found(&self) -> bool {
        self.hit.is_some()
    }

    pub fn evidence(&self, origin_url: &str) -> EvidenceItem {
        let Some(hit) = &self.hit else {
            return EvidenceItem::missing("サイト内検索: 未検出");
        };
        let item = match hit {
            SearchHit::Direct { locator } => {
                EvidenceItem::found(origin_url, format!("サイト内検索: 検出（{locator}）"))
            }
            SearchHit::Form { locator } => {
                EvidenceItem::found(origin_url, format!("サイト内検索: 検索フォーム検出（{locator}）"))
            }
            SearchHit::Icon { locator } => match &self.icon {
                Some(IconFollowUp { modal_locator: Some(modal), url, .. }) => EvidenceItem::found(
                    url.as_str(),
                    format!("サイト内検索: 検索アイコン検出（{locator}）、モーダル内検索入力欄を確認（{modal}）"),
                ),
                Some(IconFollowUp { error: Some(e), .. }) => EvidenceItem::found(
                    origin_url,
                    format!("サイト内検索: 検索アイコン検出（{locator}）、クリック失敗: {e}"),
                ),
                _ => EvidenceItem::found(
                    origin_url,
                    format!("サイト内検索: 検索アイコン検出（{locator}）、モーダル内検索入力欄は未確認"),
                ),
            },
            SearchHit::Advanced { kind, count, .. } => {
                let mut note = format!("サイト内検索: 高度な検出（{}、{count}件）", kind.as_str());
                let mut hit_url = origin_url.to_string();
                if let Some(p) = &self.probe {
                    note.push_str(&probe_summary(p));
                    if p.results_confirmed {
                        hit_url = p.url.clone();
                    }
                }
                EvidenceItem::found(hit_url, note)
            }
        };
        item.with_detection(hit.selector(), hit.kind())
    }
}

fn probe_summary(p: &ProbeOutcome) -> String {
    if let Some(e) = &p.error {
        return format!("、検索操作エラー: {e}");
    }
    match (&p.input_locator, p.results_confirmed) {
        (None, _) => "、検索入力欄は未検出".to_string(),
        (Some(_), true) => "、検索結果ページを確認".to_string(),
        (Some(_), false) => "、検索結果は不明".to_string(),
    }
}

/* ---------------- Shared predicates ---------------- */

/// Why an element does not count, or `None` when it qualifies.
/// Every strategy goes through this one check.
fn rejection(el: &ElementInfo, page_url: &str) -> Option<String> {
    if !el.is_visible() {
        return Some(s!("hidden"));
    }
    if let Some(ex) = &el.excluded_by {
        return Some(format!("excluded by {ex}"));
    }
    if el.tag == "a" && el.raw_href.contains("search") && !is_same_origin(&el.raw_href, page_url) {
        return Some(format!("external search link {}", el.href));
    }
    None
}

fn qualifies(el: &ElementInfo, page_url: &str) -> bool {
    rejection(el, page_url).is_none()
}

fn bucket_contains_any(parts: &[&str], tokens: &[String]) -> bool {
    let bucket = parts.join(" ").to_lowercase();
    tokens.iter().any(|t| !t.is_empty() && bucket.contains(&t.to_lowercase()))
}

fn looks_like_search_input(el: &ElementInfo) -> bool {
    let name = el.name.to_lowercase();
    let placeholder = el.placeholder.to_lowercase();
    name == "q"
        || name.contains("search")
        || el.id.to_lowercase().contains("search")
        || el.class_name.to_lowercase().contains("search")
        || placeholder.contains("search")
        || placeholder.contains("検索")
        || el.input_type.eq_ignore_ascii_case("search")
}

fn looks_like_search_image(el: &ElementInfo) -> bool {
    let alt = el.alt.to_lowercase();
    let value = el.value.to_lowercase();
    alt.contains("search")
        || alt.contains("検索")
        || el.src.to_lowercase().contains("search")
        || value.contains("search")
        || value.contains("検索")
}

async fn query_or_empty<P: Page + ?Sized>(page: &mut P, query: ElementQuery<'_>) -> Vec<ElementInfo> {
    match page.query(&query).await {
        Ok(found) => found,
        Err(e) => {
            logd!("query {} failed: {e}", query.locator);
            Vec::new()
        }
    }
}

/// First locator (in list order) whose first visible match exists.
async fn first_visible<P: Page + ?Sized>(page: &mut P, locators: &[String]) -> Option<String> {
    for locator in locators {
        match page.query_visible(locator).await {
            Ok(Some(_)) => return Some(locator.clone()),
            Ok(None) => {}
            Err(e) => logd!("query {locator} failed: {e}"),
        }
    }
    None
}

/* ---------------- Strategies ---------------- */

/// Steps 1 and 3: first locator with a qualifying match.
async fn first_qualifying<P: Page + ?Sized>(
    page: &mut P,
    locators: &[String],
    exclusions: &[String],
    page_url: &str,
) -> Option<String> {
    for locator in locators {
        let found = query_or_empty(page, ElementQuery::new(locator).excluding(exclusions)).await;
        if found.is_empty() {
            logd!("no match: {locator}");
            continue;
        }
        match found.iter().find(|el| qualifies(el, page_url)) {
            Some(_) => return Some(locator.clone()),
            None => {
                let why = found.first().and_then(|el| rejection(el, page_url)).unwrap_or_default();
                logd!("rejected {locator}: {why}");
            }
        }
    }
    None
}

/// Step 2: a form holding at least one visible search-like input.
async fn first_search_form<P: Page + ?Sized>(page: &mut P, forms: &[String]) -> Option<String> {
    for form in forms {
        let inputs = query_or_empty(page, ElementQuery::new(FORM_SEARCH_INPUTS).within(form)).await;
        logd!("form {form}: {} search-like inputs", inputs.len());
        if inputs.iter().any(ElementInfo::is_visible) {
            return Some(form.clone());
        }
    }
    None
}

/// Step 3 follow-up: click the icon and look for a modal input.
async fn open_icon<P: Page + ?Sized>(
    page: &mut P,
    locator: &str,
    modal_selectors: &[String],
    timing: &Timing,
) -> IconFollowUp {
    if let Err(e) = page.click(locator).await {
        logw!("search icon click failed ({locator}): {e}");
        return IconFollowUp { error: Some(e.to_string()), ..Default::default() };
    }
    sleep(timing.after_icon_click).await;

    let mut modal_locator = None;
    for modal in modal_selectors {
        if !query_or_empty(page, ElementQuery::new(modal)).await.is_empty() {
            modal_locator = Some(modal.clone());
            break;
        }
    }
    let url = page.current_url().await.unwrap_or_default();
    IconFollowUp { modal_locator, url, error: None }
}

/// Step 4, sub-strategies (a) through (f) in order.
async fn advanced<P: Page + ?Sized>(page: &mut P, kw: &SearchKeywords, page_url: &str) -> Option<SearchHit> {
    let ex = kw.exclude_selectors.as_slice();
    let hit = |kind, count, click_target| Some(SearchHit::Advanced { kind, count, click_target });

    // (a) shadow roots
    if !kw.input_selectors.is_empty() {
        let joined = kw.input_selectors.join(", ");
        let found = query_or_empty(page, ElementQuery::new(&joined).in_shadow_roots().excluding(ex)).await;
        let count = found.iter().filter(|el| qualifies(el, page_url)).count();
        if count > 0 {
            return hit(DetectionKind::ShadowDom, count, None);
        }
    }

    // (b) hidden inputs that say they are search
    if !kw.hidden_indicators.is_empty() {
        let found = query_or_empty(page, ElementQuery::new("input").excluding(ex)).await;
        let count = found
            .iter()
            .filter(|el| !el.is_visible() && el.excluded_by.is_none())
            .filter(|el| {
                bucket_contains_any(&[&el.class_name, &el.placeholder, &el.aria_label, &el.id], &kw.hidden_indicators)
            })
            .count();
        if count > 0 {
            return hit(DetectionKind::HiddenElement, count, None);
        }
    }

    // (c) pointer-cursor elements carrying a trigger phrase
    if !kw.trigger_texts.is_empty() {
        let found = query_or_empty(page, ElementQuery::new(CLICKABLE_TAGS).excluding(ex)).await;
        let clickables: Vec<&ElementInfo> = found
            .iter()
            .filter(|el| qualifies(el, page_url) && el.has_pointer_cursor())
            .filter(|el| bucket_contains_any(&[&el.text, &el.class_name, &el.aria_label, &el.title], &kw.trigger_texts))
            .collect();
        if let Some(first) = clickables.first() {
            return hit(DetectionKind::ClickableElement, clickables.len(), Some(first.locator()));
        }
    }

    // (d) specific structural patterns
    let mut count = 0;
    let mut first_pattern: Option<&String> = None;
    for pattern in &kw.specific_patterns {
        let n = query_or_empty(page, ElementQuery::new(pattern).excluding(ex))
            .await
            .iter()
            .filter(|el| qualifies(el, page_url))
            .count();
        if n > 0 && first_pattern.is_none() {
            first_pattern = Some(pattern);
        }
        count += n;
    }
    if let Some(pattern) = first_pattern {
        return hit(DetectionKind::SpecificPattern, count, Some(pattern.clone()));
    }

    // (e) form inputs named like search
    let found = query_or_empty(page, ElementQuery::new(FORM_INPUTS).excluding(ex)).await;
    let count = found.iter().filter(|el| qualifies(el, page_url) && looks_like_search_input(el)).count();
    if count > 0 {
        return hit(DetectionKind::AdvancedForm, count, None);
    }

    // (f) image buttons
    let found = query_or_empty(page, ElementQuery::new(IMAGE_INPUTS).excluding(ex)).await;
    let count = found.iter().filter(|el| qualifies(el, page_url) && looks_like_search_image(el)).count();
    if count > 0 {
        return hit(DetectionKind::ImageButton, count, None);
    }

    None
}

/// Click a trigger, type the probe query, submit, and look for result wording.
async fn probe<P: Page + ?Sized>(page: &mut P, target: &str, kw: &SearchKeywords, timing: &Timing) -> ProbeOutcome {
    let mut out = ProbeOutcome::default();

    if let Err(e) = page.click(target).await {
        logw!("search trigger click failed ({target}): {e}");
        out.error = Some(e.to_string());
        return out;
    }
    sleep(timing.after_trigger_click).await;

    let Some(input) = first_visible(page, &kw.input_selectors).await else {
        logd!("no search input appeared after clicking {target}");
        return out;
    };
    out.input_locator = Some(input.clone());

    if let Err(e) = page.type_text(&input, PROBE_QUERY).await {
        out.error = Some(e.to_string());
        return out;
    }
    sleep(timing.after_type).await;

    let mut submitted = Submission::Enter;
    if let Some(button) = first_visible(page, &kw.submit_selectors).await {
        match page.click(&button).await {
            Ok(()) => submitted = Submission::Button(button),
            Err(e) => logd!("submit button {button} failed: {e}"),
        }
    }
    if submitted == Submission::Enter {
        if let Err(e) = page.press_enter().await {
            out.error = Some(e.to_string());
            return out;
        }
    }
    sleep(timing.after_submit).await;
    out.submitted = Some(submitted);

    out.url = page.current_url().await.unwrap_or_default();
    let text = page.current_text().await.unwrap_or_default().to_lowercase();
    out.results_confirmed = SEARCH_RESULT_INDICATORS.iter().any(|i| text.contains(&i.to_lowercase()));
    out
}

/* ---------------- Entry point ---------------- */

pub async fn detect_search<P: Page + ?Sized>(page: &mut P, kw: &SearchKeywords, timing: &Timing) -> SearchDetection {
    let page_url = page.current_url().await.unwrap_or_default();
    let ex = kw.exclude_selectors.as_slice();

    if let Some(locator) = first_qualifying(page, &kw.selectors, ex, &page_url).await {
        logf!("search element: {locator}");
        return SearchDetection { hit: Some(SearchHit::Direct { locator }), ..Default::default() };
    }

    if let Some(locator) = first_search_form(page, &kw.form_selectors).await {
        logf!("search form: {locator}");
        return SearchDetection { hit: Some(SearchHit::Form { locator }), ..Default::default() };
    }

    if let Some(locator) = first_qualifying(page, &kw.icon_selectors, ex, &page_url).await {
        logf!("search icon: {locator}");
        let icon = open_icon(page, &locator, &kw.modal_selectors, timing).await;
        return SearchDetection { hit: Some(SearchHit::Icon { locator }), icon: Some(icon), probe: None };
    }

    let Some(hit) = advanced(page, kw, &page_url).await else {
        logf!("no search capability found");
        return SearchDetection::default();
    };
    logf!("search (advanced): {}", hit.kind().as_str());
    let probe = match &hit {
        SearchHit::Advanced { click_target: Some(target), .. } => Some(probe(page, target, kw, timing).await),
        _ => None,
    };
    SearchDetection { hit: Some(hit), icon: None, probe }
}
