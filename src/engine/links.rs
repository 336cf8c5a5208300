// src/engine/links.rs
//! Link harvesting on the origin page. Pure functions over scraped anchors.

use crate::config::keywords::LinkPatterns;
use crate::config::Keywords;
use crate::core::weburl::{host_of, hosts_related, is_http};
use crate::page::{ElementInfo, Link};

/// First matching link per feature, scanning anchors in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateLinks {
    pub top_message: Option<String>,
    pub officer: Option<String>,
    pub library: Option<String>,
    pub financial: Option<String>,
    pub stock: Option<String>,
}

fn matches(link: &Link, text: &str, patterns: &LinkPatterns) -> bool {
    patterns.text_patterns.iter().any(|p| !p.is_empty() && text.contains(p.as_str()))
        || patterns.url_patterns.iter().any(|p| !p.is_empty() && link.href.contains(p.as_str()))
}

fn fill(slot: &mut Option<String>, href: &str, ok: bool) {
    if slot.is_none() && ok {
        *slot = Some(href.to_string());
    }
}

/// `host` is the origin page's host; library, financial and stock links must mention it.
pub fn harvest(links: &[Link], kw: &Keywords, host: &str) -> CandidateLinks {
    let mut out = CandidateLinks::default();
    for link in links {
        let href = link.href.as_str();
        if !is_http(href) {
            continue;
        }
        let text = link.text.trim();
        let same_site = href.contains(host);

        fill(&mut out.top_message, href, matches(link, text, &kw.top_message.link));
        fill(&mut out.officer, href, matches(link, text, &kw.officer) && !href.contains('#'));
        fill(&mut out.library, href, matches(link, text, &kw.integrated_report.link) && same_site);
        fill(&mut out.financial, href, matches(link, text, &kw.financial) && same_site);
        fill(
            &mut out.stock,
            href,
            matches(link, text, &kw.stock.link)
                && same_site
                && kw.stock.exclude_urls.iter().all(|ex| ex.is_empty() || !href.contains(ex.as_str())),
        );
    }
    out
}

/// Anchors whose trimmed, upper-cased text equals one of the patterns.
pub fn english_text_links<'a>(links: &'a [Link], patterns: &[String]) -> Vec<&'a Link> {
    let wanted: Vec<String> = patterns.iter().map(|p| p.trim().to_uppercase()).collect();
    links
        .iter()
        .filter(|l| {
            let t = l.text.trim().to_uppercase();
            !t.is_empty() && wanted.contains(&t)
        })
        .collect()
}

/// First href on the same site (or a sub/super-domain), not a bare `#` anchor,
/// and not on an excluded domain.
pub fn choose_english_url<'a, I>(hrefs: I, host: &str, exclude_domains: &[String]) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .find(|href| {
            host_of(href).is_some_and(|h| hosts_related(&h, host))
                && !href.ends_with('#')
                && exclude_domains.iter().all(|d| d.is_empty() || !href.contains(d.as_str()))
        })
        .map(str::to_string)
}

/// First menu entry whose text carries a sustainability keyword, with that keyword.
pub fn find_sustainability<'a>(items: &'a [ElementInfo], menu_keywords: &[String]) -> Option<(&'a ElementInfo, String)> {
    items.iter().find_map(|el| {
        menu_keywords
            .iter()
            .find(|k| !k.is_empty() && el.text.contains(k.as_str()))
            .map(|k| (el, k.clone()))
    })
}
