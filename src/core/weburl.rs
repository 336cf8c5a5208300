// src/core/weburl.rs
//! Origin checks over `url::Url`. Hosts come back lower-cased; ports are
//! ignored.

use url::Url;

/// `https://ir.example.co.jp:443/a?b` -> `ir.example.co.jp`
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed.host_str().filter(|h| !h.is_empty()).map(str::to_ascii_lowercase)
}

fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

pub fn is_http(url: &str) -> bool {
    Url::parse(url.trim()).is_ok_and(|u| is_web(&u))
}

/// Either host equals the other or one is a subdomain of the other.
pub fn hosts_related(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
    a == b || a.ends_with(&format!(".{b}")) || b.ends_with(&format!(".{a}"))
}

/// Does a link's written href point at the page's own origin?
///
/// Only `http(s)://` and protocol-relative `//` hrefs are resolved. Anything
/// else is a relative path and is trusted without resolving it against the
/// document base, so a `<base>` tag pointing elsewhere is not noticed.
pub fn is_same_origin(raw_href: &str, page_url: &str) -> bool {
    let href = raw_href.trim();
    let absolute = href.starts_with("//") || Url::parse(href).is_ok_and(|u| is_web(&u));
    if !absolute {
        return true;
    }
    let Ok(base) = Url::parse(page_url.trim()) else {
        return false;
    };
    match base.join(href) {
        Ok(target) => target.host_str().is_some() && target.host_str() == base.host_str(),
        Err(_) => false,
    }
}

/// Company label from a URL: first host label, `www.` stripped.
pub fn company_from_url(url: &str) -> String {
    let Some(host) = host_of(url) else { return url.to_string() };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.split('.').next().unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts() {
        assert_eq!(host_of("https://IR.Example.co.jp:8443/x?y#z").as_deref(), Some("ir.example.co.jp"));
        assert_eq!(host_of("http://user@example.com").as_deref(), Some("example.com"));
        assert_eq!(host_of("/relative/path"), None);
    }

    #[test]
    fn ipv6_hosts_keep_their_brackets() {
        assert_eq!(host_of("http://[::1]:8080/ir/").as_deref(), Some("[::1]"));
        assert!(is_same_origin("http://[::1]:9000/search", "http://[::1]:8080/ir/"));
    }

    #[test]
    fn http_schemes_only() {
        assert!(is_http("https://www.example.co.jp/ir/"));
        assert!(is_http("HTTP://example.com"));
        assert!(!is_http("mailto:ir@example.co.jp"));
        assert!(!is_http("/ir/library/"));
    }

    #[test]
    fn related_hosts_cover_subdomains_both_ways() {
        assert!(hosts_related("www.example.co.jp", "www.example.co.jp"));
        assert!(hosts_related("en.www.example.co.jp", "www.example.co.jp"));
        assert!(hosts_related("example.co.jp", "ir.example.co.jp"));
        assert!(!hosts_related("notexample.co.jp", "example.co.jp"));
    }

    #[test]
    fn relative_hrefs_are_trusted() {
        let page = "https://www.example.co.jp/ir/";
        assert!(is_same_origin("/search/", page));
        assert!(is_same_origin("search.html", page));
        assert!(is_same_origin("https://www.example.co.jp/search", page));
        assert!(is_same_origin("//www.example.co.jp/search", page));
        assert!(!is_same_origin("https://search.vendor.com/?site=example", page));
        assert!(!is_same_origin("//search.vendor.com/", page));
    }

    #[test]
    fn urls_inside_a_relative_query_stay_relative() {
        let page = "https://www.example.co.jp/ir/";
        assert!(is_same_origin("/search/?return=https://www.other.net/", page));
        assert!(is_same_origin("search.php?ref=http://x.example.net", page));
    }

    #[test]
    fn company_names() {
        assert_eq!(company_from_url("https://www.toyota.co.jp/ir/"), "toyota");
        assert_eq!(company_from_url("https://ir.sony.com"), "ir");
        assert_eq!(company_from_url("not a url"), "not a url");
    }
}
