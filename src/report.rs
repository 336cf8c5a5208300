// src/report.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputStyle;
use crate::csv::rows_to_string;
use crate::engine::{Feature, SurveyResult};
use crate::error::RunError;
use crate::file::ensure_parent;
use crate::urls::UrlEntry;

pub const DETAILED_HEADERS: [&str; 7] =
    ["対象URL", "調査項目", "Value", "ヒットしたURL", "検出セレクタ", "検出要素タイプ", "備考"];

const SEP: char = ',';

/* ---------------- Detailed ---------------- */

/// Eight rows per URL, fixed feature order.
pub fn detailed_rows(results: &[SurveyResult]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(results.len() * Feature::ALL.len());
    for r in results {
        for feature in Feature::ALL {
            let item = r.item(feature);
            rows.push(vec![
                r.url.clone(),
                s!(feature.label()),
                item.value.to_string(),
                item.hit_url.clone(),
                item.detected_selector.clone(),
                item.detected_element_type.clone(),
                item.note.clone(),
            ]);
        }
    }
    rows
}

/* ---------------- Compact ---------------- */

/// One row per URL with the two primary features. The code column appears
/// only when some entry carries a code.
pub fn compact_table(entries: &[UrlEntry], results: &[SurveyResult]) -> (Vec<String>, Vec<Vec<String>>) {
    let with_code = entries.iter().any(|e| e.code.is_some());

    let mut headers = Vec::with_capacity(7);
    if with_code {
        headers.push(s!("コード"));
    }
    headers.extend(
        ["企業名", "URL", "実際のURL", "サイト内検索機能", "英語版サイト", "備考"].map(String::from),
    );

    let rows = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let entry = entries.get(i).filter(|e| e.url == r.url);
            let mut row = Vec::with_capacity(headers.len());
            if with_code {
                row.push(entry.and_then(|e| e.code.clone()).unwrap_or_default());
            }
            row.push(entry.map(|e| e.name.clone()).unwrap_or_else(|| r.url.clone()));
            row.push(r.url.clone());
            row.push(r.actual_url.clone());
            row.push(r.value(Feature::Search).to_string());
            row.push(r.value(Feature::English).to_string());
            row.push(r.error.as_ref().map(|e| format!("エラー: {e}")).unwrap_or_default());
            row
        })
        .collect();

    (headers, rows)
}

/* ---------------- Output ---------------- */

pub fn render(style: OutputStyle, entries: &[UrlEntry], results: &[SurveyResult]) -> String {
    match style {
        OutputStyle::Detailed => {
            let headers = DETAILED_HEADERS.map(String::from);
            rows_to_string(&headers, &detailed_rows(results), SEP)
        }
        OutputStyle::Compact => {
            let (headers, rows) = compact_table(entries, results);
            rows_to_string(&headers, &rows, SEP)
        }
    }
}

/// Write the report as UTF-8, creating parent directories. Returns the path written.
pub fn write_report(
    path: &Path,
    style: OutputStyle,
    entries: &[UrlEntry],
    results: &[SurveyResult],
) -> Result<PathBuf, RunError> {
    ensure_parent(path)?;
    let contents = render(style, entries, results);
    fs::write(path, contents).map_err(|source| RunError::Io { path: path.to_path_buf(), source })?;
    logf!("wrote {} results to {}", results.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::engine::EvidenceItem;

    fn sample() -> SurveyResult {
        let mut r = SurveyResult::new("https://www.acme.co.jp/ir/", Mode::Full);
        r.actual_url = s!("https://www.acme.co.jp/ir/index.html");
        for f in Feature::ALL {
            r.set(f, EvidenceItem::missing(format!("{}: リンク未検出", f.short())));
        }
        r.set(Feature::Search, EvidenceItem::found("https://www.acme.co.jp/ir/", "サイト内検索: 有"));
        r
    }

    #[test]
    fn detailed_has_eight_rows_per_url_in_order() {
        let rows = detailed_rows(&[sample(), sample()]);
        assert_eq!(rows.len(), 16);
        assert_eq!(rows[0][1], Feature::Search.label());
        assert_eq!(rows[0][2], "1");
        assert_eq!(rows[7][1], Feature::Sustainability.label());
        assert_eq!(rows[8][0], "https://www.acme.co.jp/ir/");
        assert!(rows.iter().all(|r| r.len() == DETAILED_HEADERS.len() && !r[6].is_empty()));
    }

    #[test]
    fn detailed_render_starts_with_header() {
        let out = render(OutputStyle::Detailed, &[], &[sample()]);
        assert!(out.starts_with("対象URL,調査項目,Value,ヒットしたURL,検出セレクタ,検出要素タイプ,備考\n"));
        assert_eq!(out.lines().count(), 9);
    }

    #[test]
    fn compact_code_column_only_when_present() {
        let entries = vec![UrlEntry::from_url("https://www.acme.co.jp/ir/")];
        let (headers, rows) = compact_table(&entries, &[sample()]);
        assert_eq!(headers[0], "企業名");
        assert_eq!(rows[0], ["acme", "https://www.acme.co.jp/ir/", "https://www.acme.co.jp/ir/index.html", "1", "0", ""]);

        let mut coded = entries.clone();
        coded[0].code = Some(s!("1301"));
        let (headers, rows) = compact_table(&coded, &[sample()]);
        assert_eq!(headers.len(), 7);
        assert_eq!(rows[0][0], "1301");
    }

    #[test]
    fn compact_error_note() {
        let entries = vec![UrlEntry::from_url("https://down.example/")];
        let failed = SurveyResult::failed("https://down.example/", Mode::Primary, "timed out");
        let (_, rows) = compact_table(&entries, &[failed]);
        assert_eq!(rows[0].last().map(String::as_str), Some("エラー: timed out"));
    }

    #[test]
    fn writes_into_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/nested/report.csv");
        write_report(&path, OutputStyle::Compact, &[], &[sample()]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("企業名,URL,"));
    }
}
