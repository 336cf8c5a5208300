// src/page.rs
//! The page snapshot interface the engine drives.
//!
//! A `Page` is owned exclusively by one URL investigation at a time. Every
//! method is an I/O suspension point; nothing here decides anything. Visibility
//! and exclusion verdicts are made by engine code from the raw facts an
//! implementation reports in `ElementInfo`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::PageError;

/// An anchor scraped from a page: absolute href + trimmed text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

impl Link {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self { href: href.into(), text: text.into() }
    }
}

/// Raw facts about one matched element.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementInfo {
    /// Lower-case tag name.
    pub tag: String,
    pub id: String,
    pub class_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub placeholder: String,
    pub aria_label: String,
    pub title: String,
    pub alt: String,
    pub src: String,
    pub value: String,
    /// Resolved href (empty when the element has none).
    pub href: String,
    /// The href attribute exactly as written.
    pub raw_href: String,
    pub text: String,
    pub width: f64,
    pub height: f64,
    pub display: String,
    pub visibility: String,
    pub opacity: String,
    pub cursor: String,
    /// First exclusion locator this element matches, as reported by the page.
    pub excluded_by: Option<String>,
}

impl ElementInfo {
    /// The one visibility rule every detection strategy uses: a non-empty
    /// rendered box and no `display:none` / `visibility:hidden` / `opacity:0`.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.display != "none"
            && self.visibility != "hidden"
            && !is_zero_opacity(&self.opacity)
    }

    pub fn has_pointer_cursor(&self) -> bool {
        self.cursor == "pointer"
    }

    /// A best-effort locator that re-finds this element for a click.
    pub fn locator(&self) -> String {
        if !self.id.is_empty() {
            return format!("#{}", self.id);
        }
        let classes: Vec<&str> = self.class_name.split_whitespace().collect();
        if !classes.is_empty() {
            return format!("{}.{}", self.tag, classes.join("."));
        }
        self.tag.clone()
    }
}

fn is_zero_opacity(opacity: &str) -> bool {
    opacity.trim().parse::<f64>().map(|o| o == 0.0).unwrap_or(false)
}

/// Where a locator is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope<'a> {
    Document,
    /// Inside the first element matching this locator.
    Within(&'a str),
    /// Inside every open shadow root on the page.
    ShadowRoots,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementQuery<'a> {
    pub locator: &'a str,
    pub scope: Scope<'a>,
    /// Locators an implementation checks each match against (`excluded_by`).
    pub exclusions: &'a [String],
}

impl<'a> ElementQuery<'a> {
    pub fn new(locator: &'a str) -> Self {
        Self { locator, scope: Scope::Document, exclusions: &[] }
    }
    pub fn within(mut self, container: &'a str) -> Self {
        self.scope = Scope::Within(container);
        self
    }
    pub fn in_shadow_roots(mut self) -> Self {
        self.scope = Scope::ShadowRoots;
        self
    }
    pub fn excluding(mut self, exclusions: &'a [String]) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[async_trait]
pub trait Page: Send {
    /// Load `url`; returns the post-redirect URL.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<String, PageError>;
    async fn current_url(&mut self) -> Result<String, PageError>;
    async fn title(&mut self) -> Result<String, PageError>;
    /// Visible text of the whole document.
    async fn current_text(&mut self) -> Result<String, PageError>;
    /// All matches for a query, in document order.
    async fn query(&mut self, query: &ElementQuery<'_>) -> Result<Vec<ElementInfo>, PageError>;
    async fn links(&mut self) -> Result<Vec<Link>, PageError>;
    async fn click(&mut self, locator: &str) -> Result<(), PageError>;
    async fn type_text(&mut self, locator: &str, text: &str) -> Result<(), PageError>;
    /// Synthetic "confirm" key on the focused element.
    async fn press_enter(&mut self) -> Result<(), PageError>;

    async fn close(&mut self) -> Result<(), PageError> {
        Ok(())
    }

    /// First visible match for `locator`, if any.
    async fn query_visible(&mut self, locator: &str) -> Result<Option<ElementInfo>, PageError> {
        let found = self.query(&ElementQuery::new(locator)).await?;
        Ok(found.into_iter().find(ElementInfo::is_visible))
    }

    /// Poll until any locator matches or `timeout` elapses. `Ok(false)` on timeout.
    async fn wait_for_any(
        &mut self,
        locators: &[String],
        timeout: Duration,
        poll: Duration,
    ) -> Result<bool, PageError> {
        let deadline = Instant::now() + timeout;
        loop {
            for locator in locators {
                if !self.query(&ElementQuery::new(locator)).await?.is_empty() {
                    return Ok(true);
                }
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(poll).await;
        }
    }
}

/// Lets the runner hand out fresh pages (and throw broken ones away).
#[async_trait]
pub trait PageSource: Send {
    type Page: Page;
    async fn open_page(&mut self) -> Result<Self::Page, PageError>;
}
