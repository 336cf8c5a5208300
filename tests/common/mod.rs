// tests/common/mod.rs
//! Scripted in-memory pages for driving the engine without a browser.
//!
//! Queries are answered by exact key lookup:
//! - document scope: the locator itself
//! - `Scope::Within(c)`: `"<c> <locator>"`
//! - `Scope::ShadowRoots`: `"::shadow <locator>"`
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use ir_survey::config::{Keywords, Mode, SurveyClock, SurveyOptions, Timing};
use ir_survey::error::PageError;
use ir_survey::page::{ElementInfo, ElementQuery, Link, Page, PageSource, Scope};

/* ---------------- Fixtures ---------------- */

pub fn keywords() -> Keywords {
    Keywords::from_json(include_str!("../../config/keywords.json")).unwrap()
}

pub fn options(mode: Mode) -> SurveyOptions {
    SurveyOptions { wait_ms: 0, mode, timing: Timing::instant(), ..Default::default() }
}

/// 2025-10-14 12:00: message window starts 2024-01-01, minimum years are 2024.
pub fn clock() -> SurveyClock {
    SurveyClock::at(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap().and_hms_opt(12, 0, 0).unwrap())
}

pub fn visible(tag: &str) -> ElementInfo {
    ElementInfo {
        tag: tag.into(),
        width: 120.0,
        height: 24.0,
        display: "block".into(),
        visibility: "visible".into(),
        opacity: "1".into(),
        cursor: "auto".into(),
        ..Default::default()
    }
}

pub fn hidden(tag: &str) -> ElementInfo {
    ElementInfo { display: "none".into(), width: 0.0, height: 0.0, ..visible(tag) }
}

pub fn anchor(text: &str, href: &str) -> ElementInfo {
    ElementInfo { text: text.into(), href: href.into(), raw_href: href.into(), ..visible("a") }
}

pub fn within_key(container: &str, locator: &str) -> String {
    format!("{container} {locator}")
}

pub fn shadow_key(locator: &str) -> String {
    format!("::shadow {locator}")
}

/* ---------------- Documents ---------------- */

#[derive(Clone, Debug, Default)]
pub struct FakeDoc {
    pub title: String,
    pub text: String,
    pub links: Vec<Link>,
    pub elements: HashMap<String, Vec<ElementInfo>>,
    /// Clicking this locator navigates to the URL.
    pub clicks: HashMap<String, String>,
    /// Pressing Enter navigates to the URL.
    pub enter: Option<String>,
}

impl FakeDoc {
    pub fn new(title: &str, text: &str) -> Self {
        Self { title: title.into(), text: text.into(), ..Default::default() }
    }

    pub fn link(mut self, href: &str, text: &str) -> Self {
        self.links.push(Link::new(href, text));
        self
    }

    pub fn element(mut self, key: &str, el: ElementInfo) -> Self {
        self.elements.entry(key.to_string()).or_default().push(el);
        self
    }

    pub fn on_click(mut self, locator: &str, target: &str) -> Self {
        self.clicks.insert(locator.into(), target.into());
        self
    }

    pub fn on_enter(mut self, target: &str) -> Self {
        self.enter = Some(target.into());
        self
    }
}

/* ---------------- Site ---------------- */

#[derive(Debug, Default)]
pub struct SiteState {
    pub docs: HashMap<String, FakeDoc>,
    pub unreachable: HashSet<String>,
    pub redirects: HashMap<String, String>,
    pub calls: Vec<String>,
    pub opened: usize,
    pub closed: usize,
    pub refuse_open: bool,
}

/// Shared site state; cheap to clone so a test keeps a handle while the
/// runner owns another.
#[derive(Clone, Debug, Default)]
pub struct FakeSite {
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, doc: FakeDoc) -> Self {
        self.lock().docs.insert(url.into(), doc);
        self
    }

    pub fn unreachable(self, url: &str) -> Self {
        self.lock().unreachable.insert(url.into());
        self
    }

    pub fn redirect(self, from: &str, to: &str) -> Self {
        self.lock().redirects.insert(from.into(), to.into());
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("navigate ").map(str::to_string))
            .collect()
    }

    pub fn opened(&self) -> usize {
        self.lock().opened
    }

    pub fn closed(&self) -> usize {
        self.lock().closed
    }

    /// A page already sitting on `url` (no navigation recorded).
    pub fn open_at(&self, url: &str) -> FakePage {
        FakePage { site: self.clone(), url: url.into() }
    }
}

#[async_trait]
impl PageSource for FakeSite {
    type Page = FakePage;

    async fn open_page(&mut self) -> Result<FakePage, PageError> {
        let mut s = self.lock();
        if s.refuse_open {
            return Err(PageError::Browser("browser is gone".into()));
        }
        s.opened += 1;
        drop(s);
        Ok(self.open_at("about:blank"))
    }
}

/* ---------------- Page ---------------- */

pub struct FakePage {
    site: FakeSite,
    url: String,
}

impl FakePage {
    fn doc(&self) -> FakeDoc {
        self.site.lock().docs.get(&self.url).cloned().unwrap_or_default()
    }

    fn record(&self, call: String) {
        self.site.lock().calls.push(call);
    }

    fn go(&mut self, url: &str) -> Result<String, PageError> {
        let s = self.site.lock();
        if s.unreachable.contains(url) {
            return Err(PageError::Navigation { url: url.into(), details: "net::ERR_CONNECTION_REFUSED".into() });
        }
        let target = s.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        if !s.docs.contains_key(&target) {
            return Err(PageError::Navigation { url: url.into(), details: "net::ERR_NAME_NOT_RESOLVED".into() });
        }
        drop(s);
        self.url = target.clone();
        Ok(target)
    }
}

fn key(query: &ElementQuery<'_>) -> String {
    match query.scope {
        Scope::Document => query.locator.to_string(),
        Scope::Within(c) => within_key(c, query.locator),
        Scope::ShadowRoots => shadow_key(query.locator),
    }
}

#[async_trait]
impl Page for FakePage {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<String, PageError> {
        self.record(format!("navigate {url}"));
        self.go(url)
    }

    async fn current_url(&mut self) -> Result<String, PageError> {
        Ok(self.url.clone())
    }

    async fn title(&mut self) -> Result<String, PageError> {
        Ok(self.doc().title)
    }

    async fn current_text(&mut self) -> Result<String, PageError> {
        Ok(self.doc().text)
    }

    async fn query(&mut self, query: &ElementQuery<'_>) -> Result<Vec<ElementInfo>, PageError> {
        let k = key(query);
        self.record(format!("query {k}"));
        Ok(self.doc().elements.get(&k).cloned().unwrap_or_default())
    }

    async fn links(&mut self) -> Result<Vec<Link>, PageError> {
        Ok(self.doc().links)
    }

    async fn click(&mut self, locator: &str) -> Result<(), PageError> {
        self.record(format!("click {locator}"));
        let doc = self.doc();
        if let Some(target) = doc.clicks.get(locator) {
            self.go(target)?;
            return Ok(());
        }
        if doc.elements.contains_key(locator) {
            Ok(())
        } else {
            Err(PageError::NotFound(locator.into()))
        }
    }

    async fn type_text(&mut self, locator: &str, text: &str) -> Result<(), PageError> {
        self.record(format!("type {locator} {text}"));
        if self.doc().elements.contains_key(locator) {
            Ok(())
        } else {
            Err(PageError::NotFound(locator.into()))
        }
    }

    async fn press_enter(&mut self) -> Result<(), PageError> {
        self.record(s("enter"));
        if let Some(target) = self.doc().enter {
            self.go(&target)?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PageError> {
        self.record(s("close"));
        self.site.lock().closed += 1;
        Ok(())
    }

    /// One look, no polling.
    async fn wait_for_any(
        &mut self,
        locators: &[String],
        _timeout: Duration,
        _poll: Duration,
    ) -> Result<bool, PageError> {
        let doc = self.doc();
        Ok(locators.iter().any(|l| doc.elements.contains_key(l)))
    }
}

fn s(v: &str) -> String {
    v.to_string()
}
