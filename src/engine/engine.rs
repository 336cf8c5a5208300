// src/engine/engine.rs
//! Drives one URL through the survey:
//! navigate -> dynamic wait -> 404 check -> search chain -> sustainability ->
//! English version -> follow candidate links and validate -> back to origin.

use std::time::Duration;

use tokio::time::sleep;

use super::detect::detect_search;
use super::feature::{FeatureState, FollowOutcome, skipped};
use super::links::{CandidateLinks, choose_english_url, english_text_links, find_sustainability, harvest};
use super::types::{EvidenceItem, Feature, SurveyResult};
use crate::config::consts::{FOLLOW_TIMEOUT_MS, NAV_TIMEOUT_MS};
use crate::config::{Keywords, Mode, SurveyClock, SurveyOptions};
use crate::core::contains_ci;
use crate::core::weburl::host_of;
use crate::error::SurveyError;
use crate::page::{ElementQuery, Link, Page};
use crate::progress::Progress;
use crate::validators::{
    ReportCriteria, evaluate_financial_recency, evaluate_profile, evaluate_shareholder_content,
    evaluate_top_message, looks_not_found, select_integrated_report_link,
};

const LINKED_FEATURES: [Feature; 5] = [
    Feature::TopMessage,
    Feature::Profile,
    Feature::IntegratedReport,
    Feature::FinancialGraph,
    Feature::ShareholderReturn,
];

pub struct Surveyor<'a> {
    keywords: &'a Keywords,
    options: &'a SurveyOptions,
    clock: SurveyClock,
}

impl<'a> Surveyor<'a> {
    pub fn new(keywords: &'a Keywords, options: &'a SurveyOptions, clock: SurveyClock) -> Self {
        Self { keywords, options, clock }
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// Investigate one URL. Only a failed initial navigation is an error;
    /// everything after that degrades to evidence notes.
    pub async fn investigate<P: Page + ?Sized>(
        &self,
        page: &mut P,
        url: &str,
        progress: &mut dyn Progress,
    ) -> Result<SurveyResult, SurveyError> {
        let mode = self.options.mode;
        let mut result = SurveyResult::new(url, mode);

        let actual = page.navigate(url, Duration::from_millis(NAV_TIMEOUT_MS)).await?;
        self.wait_for_content(page).await;
        logd!("{url} -> {actual}");
        result.actual_url = actual.clone();

        if self.is_not_found(page).await {
            logw!("origin page is a 404: {actual}");
            for feature in Feature::ALL {
                let item = if feature.in_mode(mode) {
                    EvidenceItem::missing(format!("{}: 404エラー（{actual}）", feature.short()))
                } else {
                    skipped(feature, mode.label())
                };
                record(&mut result, feature, item, progress);
            }
            return Ok(result);
        }

        let links = page.links().await.unwrap_or_else(|e| {
            logw!("could not read links on {actual}: {e}");
            Vec::new()
        });
        let host = host_of(&actual).unwrap_or_default();
        let candidates = harvest(&links, self.keywords, &host);
        logd!("candidate links: {candidates:?}");
        let mut left_origin = false;

        if Feature::Search.in_mode(mode) {
            let detection = detect_search(page, &self.keywords.search, &self.options.timing).await;
            if detection.icon.is_some() || detection.probe.is_some() {
                self.return_to(page, &actual).await;
            }
            record(&mut result, Feature::Search, detection.evidence(&actual), progress);
        } else {
            record(&mut result, Feature::Search, skipped(Feature::Search, mode.label()), progress);
        }

        let sustainability = self.evaluate_sustainability(page, &actual).await;
        record(&mut result, Feature::Sustainability, sustainability, progress);

        if Feature::English.in_mode(mode) {
            let (item, navigated) = self.evaluate_english(page, &links, &host, &actual).await;
            if navigated {
                self.return_to(page, &actual).await;
            }
            record(&mut result, Feature::English, item, progress);
        } else {
            record(&mut result, Feature::English, skipped(Feature::English, mode.label()), progress);
        }

        for feature in LINKED_FEATURES {
            if !feature.in_mode(mode) {
                record(&mut result, feature, skipped(feature, mode.label()), progress);
                continue;
            }
            let (item, navigated) = self.evaluate_linked(page, feature, &candidates, &links, &actual).await;
            left_origin |= navigated;
            record(&mut result, feature, item, progress);
        }

        if left_origin {
            self.return_to(page, &actual).await;
        }
        Ok(result)
    }

    /* ---------------- Page plumbing ---------------- */

    /// Poll for a search element; fall back to a fixed sleep when none shows up.
    async fn wait_for_content<P: Page + ?Sized>(&self, page: &mut P) {
        let selectors = &self.keywords.search.selectors;
        let appeared = if selectors.is_empty() {
            false
        } else {
            page.wait_for_any(selectors, self.options.dynamic_wait(), self.options.timing.poll_interval)
                .await
                .unwrap_or_else(|e| {
                    logd!("dynamic wait failed: {e}");
                    false
                })
        };
        if !appeared {
            sleep(self.options.fallback_wait()).await;
        }
    }

    async fn is_not_found<P: Page + ?Sized>(&self, page: &mut P) -> bool {
        let title = page.title().await.unwrap_or_default();
        let body = page.current_text().await.unwrap_or_default();
        let heading = page
            .query(&ElementQuery::new("h1"))
            .await
            .ok()
            .and_then(|found| found.into_iter().next())
            .map(|h| h.text);
        looks_not_found(&title, &body, heading.as_deref())
    }

    async fn return_to<P: Page + ?Sized>(&self, page: &mut P, origin: &str) {
        if let Err(e) = page.navigate(origin, Duration::from_millis(FOLLOW_TIMEOUT_MS)).await {
            logw!("could not return to {origin}: {e}");
        }
    }

    /// Navigate to a candidate link, settle, and screen out soft 404s.
    async fn follow<P: Page + ?Sized>(&self, page: &mut P, href: &str) -> Result<String, FollowOutcome> {
        match page.navigate(href, Duration::from_millis(FOLLOW_TIMEOUT_MS)).await {
            Err(e) => {
                logw!("follow {href} failed: {e}");
                Err(FollowOutcome::Unreachable { reason: e.to_string() })
            }
            Ok(url) => {
                sleep(self.options.timing.after_follow).await;
                if self.is_not_found(page).await {
                    Err(FollowOutcome::NotFound { url })
                } else {
                    Ok(url)
                }
            }
        }
    }

    /* ---------------- Origin-page features ---------------- */

    async fn evaluate_sustainability<P: Page + ?Sized>(&self, page: &mut P, origin: &str) -> EvidenceItem {
        let kw = &self.keywords.sustainability;
        let joined = kw.selectors.join(", ");
        let items = page.query(&ElementQuery::new(&joined)).await.unwrap_or_else(|e| {
            logd!("menu query failed: {e}");
            Vec::new()
        });
        match find_sustainability(&items, &kw.menu_keywords) {
            Some((el, keyword)) => {
                let hit = if el.href.is_empty() { origin } else { el.href.as_str() };
                EvidenceItem::found(hit, format!("サステナビリティメニュー: 検出（「{keyword}」）"))
            }
            None => EvidenceItem::missing("サステナビリティメニュー: 未検出"),
        }
    }

    /// Returns the evidence and whether the page left the origin.
    async fn evaluate_english<P: Page + ?Sized>(
        &self,
        page: &mut P,
        links: &[Link],
        host: &str,
        origin: &str,
    ) -> (EvidenceItem, bool) {
        let kw = &self.keywords.english;
        let mut hrefs: Vec<String> = Vec::new();
        let mut by_locator = false;
        for locator in &kw.url_patterns {
            let found = page.query(&ElementQuery::new(locator)).await.unwrap_or_default();
            if !found.is_empty() {
                by_locator = true;
                hrefs.extend(found.into_iter().map(|el| el.href).filter(|h| !h.is_empty()));
            }
        }
        let by_text = english_text_links(links, &kw.text_patterns);
        hrefs.extend(by_text.iter().map(|l| l.href.clone()));

        if !by_locator && by_text.is_empty() {
            return (EvidenceItem::missing("英語版サイト: 未検出"), false);
        }

        let Some(english_url) = choose_english_url(hrefs.iter().map(String::as_str), host, &kw.exclude_domains)
        else {
            return (EvidenceItem::found(origin, "英語版サイト: 検出（URL取得失敗）"), false);
        };

        let outcome = match self.follow(page, &english_url).await {
            Err(outcome) => outcome,
            Ok(url) => FollowOutcome::Checked { reason: url.clone(), hit_url: url, passed: true },
        };
        let item = FeatureState::from_link(Some(english_url)).judge(Feature::English, outcome).finish(Feature::English);
        (item, true)
    }

    /* ---------------- Link-follow features ---------------- */

    fn report_criteria(&self) -> (i32, Vec<String>) {
        let kw = &self.keywords.integrated_report;
        (kw.min_year.unwrap_or(self.clock.previous_year), kw.all_keywords())
    }

    /// Integrated report selection over a link list.
    fn check_report(&self, links: &[Link], source: &str) -> FollowOutcome {
        let (min_year, keywords) = self.report_criteria();
        let criteria = ReportCriteria {
            min_year,
            keywords: &keywords,
            indicators: &self.keywords.integrated_report.pdf_indicators,
        };
        match select_integrated_report_link(links, &criteria) {
            Some(c) => FollowOutcome::Checked {
                reason: format!("{source}{}年度版: {}", c.latest_year, c.text.trim()),
                hit_url: c.href,
                passed: true,
            },
            None => FollowOutcome::Checked {
                hit_url: String::new(),
                passed: false,
                reason: format!("{source}{min_year}年度以降の報告書PDFなし"),
            },
        }
    }

    fn link_for(&self, feature: Feature, candidates: &CandidateLinks) -> Option<String> {
        match feature {
            Feature::TopMessage => candidates.top_message.clone(),
            Feature::Profile => candidates.officer.clone(),
            Feature::IntegratedReport => candidates.library.clone(),
            Feature::FinancialGraph => candidates.financial.clone(),
            Feature::ShareholderReturn => candidates.stock.clone(),
            _ => None,
        }
    }

    /// Run one link-follow feature through its state machine.
    async fn evaluate_linked<P: Page + ?Sized>(
        &self,
        page: &mut P,
        feature: Feature,
        candidates: &CandidateLinks,
        origin_links: &[Link],
        origin: &str,
    ) -> (EvidenceItem, bool) {
        let state = FeatureState::from_link(self.link_for(feature, candidates));

        if state == FeatureState::LinkMissing && feature == Feature::IntegratedReport {
            // no library page: look for the report among the origin's own links
            let outcome = self.check_report(origin_links, "トップページ: ");
            let item = FeatureState::from_link(Some(origin.to_string())).judge(feature, outcome).finish(feature);
            return (item, false);
        }
        let href = match &state {
            FeatureState::LinkFound { href } => Some(href.clone()),
            _ => None,
        };
        let Some(href) = href else {
            return (state.finish(feature), false);
        };

        let outcome = match self.follow(page, &href).await {
            Err(outcome) => outcome,
            Ok(url) => self.validate(page, feature, url).await,
        };
        (state.judge(feature, outcome).finish(feature), true)
    }

    /// Judge the page we just followed to.
    async fn validate<P: Page + ?Sized>(&self, page: &mut P, feature: Feature, url: String) -> FollowOutcome {
        let kw = self.keywords;
        if feature == Feature::IntegratedReport {
            let links = page.links().await.unwrap_or_default();
            return self.check_report(&links, "");
        }

        let text = page.current_text().await.unwrap_or_default();
        let (passed, reason) = match feature {
            Feature::TopMessage => {
                let len = text.chars().count();
                let min = kw.top_message.min_content_length;
                if len <= min {
                    (false, format!("本文が短すぎる（{len}文字）"))
                } else {
                    let e = evaluate_top_message(
                        &text,
                        &kw.top_message.content_keywords,
                        self.clock.message_window_start,
                        self.clock.today(),
                    );
                    (e.is_valid(), e.reason())
                }
            }
            Feature::Profile => {
                let e = evaluate_profile(
                    &text,
                    &kw.profile.career_keywords,
                    &kw.profile.ceo_keywords,
                    &kw.profile.year_patterns,
                );
                (e.is_valid(), e.reason())
            }
            Feature::FinancialGraph => {
                let has_visual = self.has_chart(page).await;
                let e = evaluate_financial_recency(has_visual, &text, self.clock.financial_min_year);
                (e.is_valid(), e.reason())
            }
            Feature::ShareholderReturn => {
                let e = evaluate_shareholder_content(&text, &kw.stock.content_keywords, kw.stock.minimum_text_length);
                (e.is_valid(), e.reason())
            }
            _ => (false, s!("対象外")),
        };
        FollowOutcome::Checked { hit_url: url, passed, reason }
    }

    /// Chart-like visual: any graph locator matches, or an image alt names a chart.
    async fn has_chart<P: Page + ?Sized>(&self, page: &mut P) -> bool {
        let kw = &self.keywords.graph;
        for locator in &kw.selectors {
            if page.query(&ElementQuery::new(locator)).await.is_ok_and(|found| !found.is_empty()) {
                return true;
            }
        }
        if kw.image_alt_keywords.is_empty() {
            return false;
        }
        let images = page.query(&ElementQuery::new("img")).await.unwrap_or_default();
        images.iter().any(|img| kw.image_alt_keywords.iter().any(|k| contains_ci(&img.alt, k)))
    }
}

fn record(result: &mut SurveyResult, feature: Feature, item: EvidenceItem, progress: &mut dyn Progress) {
    progress.feature_done(feature, &item);
    result.set(feature, item);
}
