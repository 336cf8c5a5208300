// src/browser.rs
//! Chromium adapter for the `Page` / `PageSource` traits.
//!
//! In-page work is done by a handful of fixed scripts. Locators and other
//! inputs are passed to them as JSON data, never as code.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::{Browser, BrowserConfig, Page as CdpPage};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::consts::USER_AGENT;
use crate::error::PageError;
use crate::page::{ElementInfo, ElementQuery, Link, Page, PageSource, Scope};

/// Longest element text handed back per match.
const TEXT_LIMIT: usize = 200;

const QUERY_JS: &str = r#"
(() => {
    const q = __QUERY__;
    const roots = [];
    if (q.scope === "within") {
        const container = document.querySelector(q.container);
        if (container) roots.push(container);
    } else if (q.scope === "shadow") {
        document.querySelectorAll("*").forEach((host) => { if (host.shadowRoot) roots.push(host.shadowRoot); });
    } else {
        roots.push(document);
    }
    const attr = (el, name) => el.getAttribute(name) || "";
    const out = [];
    for (const root of roots) {
        for (const el of root.querySelectorAll(q.locator)) {
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            let excludedBy = null;
            for (const ex of q.exclusions) {
                try {
                    if (el.matches(ex)) { excludedBy = ex; break; }
                } catch (_e) {}
            }
            out.push({
                tag: el.tagName.toLowerCase(),
                id: el.id || "",
                className: typeof el.className === "string" ? el.className : attr(el, "class"),
                name: attr(el, "name"),
                type: typeof el.type === "string" ? el.type : attr(el, "type"),
                placeholder: attr(el, "placeholder"),
                ariaLabel: attr(el, "aria-label"),
                title: attr(el, "title"),
                alt: attr(el, "alt"),
                src: typeof el.src === "string" ? el.src : attr(el, "src"),
                value: typeof el.value === "string" ? el.value : "",
                href: typeof el.href === "string" ? el.href : "",
                rawHref: attr(el, "href"),
                text: (el.textContent || "").trim().slice(0, q.textLimit),
                width: rect.width,
                height: rect.height,
                display: style.display,
                visibility: style.visibility,
                opacity: style.opacity,
                cursor: style.cursor,
                excludedBy,
            });
        }
    }
    return out;
})()
"#;

const LINKS_JS: &str = r#"
Array.from(document.querySelectorAll("a")).map((a) => ({
    href: typeof a.href === "string" ? a.href : "",
    text: (a.textContent || "").trim(),
}))
"#;

const TEXT_JS: &str = r#"document.body ? (document.body.textContent || "") : """#;

fn browser_err(e: impl std::fmt::Display) -> PageError {
    PageError::Browser(e.to_string())
}

/* ---------------- Session ---------------- */

/// One Chromium process; hands out pages to the runner.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(headless: bool) -> Result<Self, PageError> {
        let mut builder = BrowserConfig::builder().args(vec![
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--disable-extensions",
            "--no-first-run",
            "--lang=ja-JP",
        ]);
        if !headless {
            builder = builder.with_head();
        }
        if std::env::var("CI").is_ok() || std::env::var("NO_SANDBOX").is_ok() {
            builder = builder.no_sandbox();
        }
        let config = builder.build().map_err(PageError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_err)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    logd!("chromium handler event error: {e}");
                }
            }
        });
        logf!("chromium started (headless={headless})");
        Ok(Self { browser, handler })
    }

    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            logw!("chromium close failed: {e}");
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

#[async_trait]
impl PageSource for ChromeSession {
    type Page = ChromePage;

    async fn open_page(&mut self) -> Result<ChromePage, PageError> {
        let page = self.browser.new_page("about:blank").await.map_err(browser_err)?;
        page.set_user_agent(USER_AGENT).await.map_err(browser_err)?;
        Ok(ChromePage { page })
    }
}

/* ---------------- Page ---------------- */

pub struct ChromePage {
    page: CdpPage,
}

impl ChromePage {
    async fn eval<T: DeserializeOwned>(&self, script: &str) -> Result<T, PageError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| PageError::Evaluation(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| PageError::Evaluation(format!("decode failed: {e}")))
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn navigate(&mut self, url: &str, limit: Duration) -> Result<String, PageError> {
        let nav = async {
            self.page.goto(url).await?.wait_for_navigation().await?;
            self.page.url().await
        };
        match timeout(limit, nav).await {
            Err(_) => Err(PageError::Timeout { what: format!("navigate {url}"), ms: limit.as_millis() as u64 }),
            Ok(Err(e)) => Err(PageError::Navigation { url: url.to_string(), details: e.to_string() }),
            Ok(Ok(actual)) => Ok(actual.unwrap_or_else(|| url.to_string())),
        }
    }

    async fn current_url(&mut self) -> Result<String, PageError> {
        Ok(self.page.url().await.map_err(browser_err)?.unwrap_or_default())
    }

    async fn title(&mut self) -> Result<String, PageError> {
        Ok(self.page.get_title().await.map_err(browser_err)?.unwrap_or_default())
    }

    async fn current_text(&mut self) -> Result<String, PageError> {
        self.eval(TEXT_JS).await
    }

    async fn query(&mut self, query: &ElementQuery<'_>) -> Result<Vec<ElementInfo>, PageError> {
        let (scope, container) = match query.scope {
            Scope::Document => ("document", ""),
            Scope::Within(c) => ("within", c),
            Scope::ShadowRoots => ("shadow", ""),
        };
        let data = json!({
            "locator": query.locator,
            "scope": scope,
            "container": container,
            "exclusions": query.exclusions,
            "textLimit": TEXT_LIMIT,
        });
        self.eval(&QUERY_JS.replace("__QUERY__", &data.to_string())).await
    }

    async fn links(&mut self) -> Result<Vec<Link>, PageError> {
        self.eval(LINKS_JS).await
    }

    async fn click(&mut self, locator: &str) -> Result<(), PageError> {
        let el = self.page.find_element(locator).await.map_err(|_| PageError::NotFound(locator.to_string()))?;
        el.click().await.map_err(browser_err)?;
        Ok(())
    }

    async fn type_text(&mut self, locator: &str, text: &str) -> Result<(), PageError> {
        let el = self.page.find_element(locator).await.map_err(|_| PageError::NotFound(locator.to_string()))?;
        el.click().await.map_err(browser_err)?;
        el.type_str(text).await.map_err(browser_err)?;
        Ok(())
    }

    async fn press_enter(&mut self) -> Result<(), PageError> {
        let base = DispatchKeyEventParams::builder()
            .key("Enter")
            .code("Enter")
            .windows_virtual_key_code(13)
            .native_virtual_key_code(13);
        let down = base
            .clone()
            .r#type(DispatchKeyEventType::KeyDown)
            .text("\r")
            .build()
            .map_err(PageError::Browser)?;
        let up = base.r#type(DispatchKeyEventType::KeyUp).build().map_err(PageError::Browser)?;
        self.page.execute(down).await.map_err(browser_err)?;
        self.page.execute(up).await.map_err(browser_err)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PageError> {
        self.page.clone().close().await.map_err(browser_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusions_apply_to_the_element_itself() {
        // a `cookie-ok` class on <body> must not exclude the inputs inside it
        assert!(QUERY_JS.contains("if (el.matches(ex)) { excludedBy = ex; break; }"));
        assert!(!QUERY_JS.contains(".closest("));
    }
}
