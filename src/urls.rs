// src/urls.rs
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::core::weburl::company_from_url;
use crate::csv::parse_rows;
use crate::error::UrlListError;

/// One row of the input list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlEntry {
    pub code: Option<String>,
    pub name: String,
    pub url: String,
}

impl UrlEntry {
    /// Entry with the company name derived from the host.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self { code: None, name: company_from_url(&url), url }
    }

    fn build(code: Option<&str>, name: Option<&str>, url: &str) -> Self {
        let code = code.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => company_from_url(url),
        };
        Self { code, name, url: url.trim().to_string() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlFormat {
    Json,
    Csv,
    Txt,
}

impl UrlFormat {
    /// Explicit override wins; otherwise the extension decides, JSON when unknown.
    pub fn detect(path: &Path, override_format: Option<&str>) -> Result<Self, UrlListError> {
        if let Some(f) = override_format {
            return match f.to_ascii_lowercase().as_str() {
                "json" => Ok(UrlFormat::Json),
                "csv" => Ok(UrlFormat::Csv),
                "txt" => Ok(UrlFormat::Txt),
                other => Err(UrlListError::UnsupportedFormat(other.to_string())),
            };
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Ok(match ext.as_str() {
            "csv" => UrlFormat::Csv,
            "txt" => UrlFormat::Txt,
            _ => UrlFormat::Json,
        })
    }
}

/* ---------------- Loading ---------------- */

pub fn load_url_list(path: &Path, override_format: Option<&str>) -> Result<Vec<UrlEntry>, UrlListError> {
    if !path.exists() {
        return Err(UrlListError::Missing(path.to_path_buf()));
    }
    let format = UrlFormat::detect(path, override_format)?;
    let text = fs::read_to_string(path)
        .map_err(|source| UrlListError::Read { path: path.to_path_buf(), source })?;

    let entries = match format {
        UrlFormat::Json => parse_json(&text)?,
        UrlFormat::Csv => parse_csv(&text),
        UrlFormat::Txt => parse_txt(&text),
    };
    logd!("loaded {} URLs from {} ({format:?})", entries.len(), path.display());
    Ok(entries)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Bare(String),
    Full {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        name: Option<String>,
        url: String,
    },
}

pub fn parse_json(text: &str) -> Result<Vec<UrlEntry>, UrlListError> {
    let mut doc: Value = serde_json::from_str(text)?;
    let urls = match doc.get_mut("urls").map(Value::take) {
        Some(v @ Value::Array(_)) => v,
        _ => return Err(UrlListError::MissingUrlsArray),
    };
    let raw: Vec<JsonEntry> = serde_json::from_value(urls)?;

    Ok(raw
        .into_iter()
        .map(|e| match e {
            JsonEntry::Bare(url) => UrlEntry::from_url(url.trim()),
            JsonEntry::Full { code, name, url } => {
                UrlEntry::build(code.as_deref(), name.as_deref(), &url)
            }
        })
        .filter(|e| !e.url.is_empty())
        .collect())
}

/// Header row required. `|` delimits when the header has one.
pub fn parse_csv(text: &str) -> Vec<UrlEntry> {
    let Some(header) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return Vec::new();
    };
    let sep = if header.contains('|') { '|' } else { ',' };

    let rows = parse_rows(text, sep);
    let Some((head, body)) = rows.split_first() else {
        return Vec::new();
    };
    let has_code = head.iter().any(|h| {
        let h = h.trim().to_lowercase();
        h == "code" || h.contains("コード")
    });

    let cell = |row: &[String], i: usize| row.get(i).map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

    body.iter()
        .map(Vec::as_slice)
        .filter_map(|row| {
            if has_code {
                let url = cell(row, 2).or_else(|| cell(row, 1))?;
                Some(UrlEntry::build(cell(row, 0).as_deref(), cell(row, 1).as_deref(), &url))
            } else {
                let url = cell(row, 1)?;
                Some(UrlEntry::build(None, cell(row, 0).as_deref(), &url))
            }
        })
        .collect()
}

pub fn parse_txt(text: &str) -> Vec<UrlEntry> {
    text.lines()
        .map(str::trim)
        .filter(|l| l.starts_with("http"))
        .map(UrlEntry::from_url)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension_then_override() {
        let p = PathBuf::from("input/list.CSV");
        assert_eq!(UrlFormat::detect(&p, None).unwrap(), UrlFormat::Csv);
        assert_eq!(UrlFormat::detect(&p, Some("txt")).unwrap(), UrlFormat::Txt);
        assert_eq!(UrlFormat::detect(Path::new("urls"), None).unwrap(), UrlFormat::Json);
        assert!(matches!(
            UrlFormat::detect(&p, Some("xlsx")),
            Err(UrlListError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn json_mixes_strings_and_objects() {
        let list = parse_json(
            r#"{"urls": [
                "https://www.sample.co.jp/ir/",
                {"code": "7203", "name": "トヨタ自動車", "url": "https://global.toyota/jp/ir/"},
                {"url": "https://example.com/ir"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], UrlEntry { code: None, name: s!("sample"), url: s!("https://www.sample.co.jp/ir/") });
        assert_eq!(list[1].code.as_deref(), Some("7203"));
        assert_eq!(list[1].name, "トヨタ自動車");
        assert_eq!(list[2].name, "example");
    }

    #[test]
    fn json_without_urls_array_is_rejected() {
        assert!(matches!(parse_json(r#"{"urls": "x"}"#), Err(UrlListError::MissingUrlsArray)));
        assert!(matches!(parse_json(r#"{"list": []}"#), Err(UrlListError::MissingUrlsArray)));
        assert!(matches!(parse_json("not json"), Err(UrlListError::Json(_))));
    }

    #[test]
    fn csv_with_code_column_and_pipes() {
        let list = parse_csv("コード|企業名|URL\n1301|極洋|\"https://www.kyokuyo.co.jp/ir/\"\n1332||https://www.nissui.co.jp/ir/\n");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].code.as_deref(), Some("1301"));
        assert_eq!(list[0].url, "https://www.kyokuyo.co.jp/ir/");
        assert_eq!(list[1].name, "nissui");
    }

    #[test]
    fn csv_without_code_column() {
        let list = parse_csv("name,url\nAcme,https://acme.example/ir\n,https://www.beta.example/\n");
        assert_eq!(list[0], UrlEntry { code: None, name: s!("Acme"), url: s!("https://acme.example/ir") });
        assert_eq!(list[1].name, "beta");
    }

    #[test]
    fn txt_keeps_only_http_lines() {
        let list = parse_txt("# comment\nhttps://a.example/ir\n\n  http://www.b.example/  \nftp://c.example\n");
        let urls: Vec<_> = list.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["https://a.example/ir", "http://www.b.example/"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_url_list(Path::new("/nonexistent/urls.txt"), None).unwrap_err();
        assert!(matches!(err, UrlListError::Missing(_)));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://www.example.co.jp/ir/\n").unwrap();
        let list = load_url_list(&path, None).unwrap();
        assert_eq!(list, vec![UrlEntry::from_url("https://www.example.co.jp/ir/")]);
    }
}
