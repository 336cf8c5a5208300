// src/runner.rs
use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::consts::FAILURE_THRESHOLD;
use crate::engine::{Feature, Surveyor, SurveyResult};
use crate::error::PageError;
use crate::page::{Page, PageSource};
use crate::progress::Progress;
use crate::urls::UrlEntry;

/// Counts for the end-of-run summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub errors: usize,
    /// URLs with value 1, per feature.
    pub found: BTreeMap<Feature, usize>,
    /// Times the page was thrown away after consecutive failures.
    pub page_resets: usize,
}

impl RunSummary {
    fn tally(&mut self, result: &SurveyResult) {
        self.total += 1;
        if result.error.is_some() {
            self.errors += 1;
        }
        for (feature, item) in &result.items {
            if item.is_found() {
                *self.found.entry(*feature).or_default() += 1;
            }
        }
    }

    /// Human summary, one line per feature evaluated in the run.
    pub fn lines(&self, features: &[Feature]) -> Vec<String> {
        let mut out = vec![format!("調査件数: {} (エラー: {})", self.total, self.errors)];
        for f in features {
            let n = self.found.get(f).copied().unwrap_or(0);
            out.push(format!("  {}: {n}/{}", f.short(), self.total));
        }
        out
    }
}

/// Survey every entry in order on one reused page.
///
/// A URL-level failure becomes an error result and the loop moves on. After
/// `FAILURE_THRESHOLD` consecutive failures the page is replaced and the
/// counter reset. Only failing to open the first page is fatal.
pub async fn run_survey<S: PageSource>(
    source: &mut S,
    entries: &[UrlEntry],
    surveyor: &Surveyor<'_>,
    pause: Duration,
    progress: &mut dyn Progress,
) -> Result<(Vec<SurveyResult>, RunSummary), PageError> {
    let mut page = source.open_page().await?;
    let mut results = Vec::with_capacity(entries.len());
    let mut summary = RunSummary::default();
    let mut consecutive_failures: u32 = 0;

    progress.begin(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        progress.url_started(i, &entry.url);

        let result = match surveyor.investigate(&mut page, &entry.url, progress).await {
            Ok(r) => {
                consecutive_failures = 0;
                r
            }
            Err(e) => {
                consecutive_failures += 1;
                loge!("{}: {e}", entry.url);
                SurveyResult::failed(&entry.url, surveyor.mode(), &e.to_string())
            }
        };

        if consecutive_failures >= FAILURE_THRESHOLD {
            logw!("{consecutive_failures} consecutive failures, recreating the page");
            progress.log("連続エラーのためページを再作成します");
            match source.open_page().await {
                Ok(fresh) => {
                    let mut old = std::mem::replace(&mut page, fresh);
                    if let Err(e) = old.close().await {
                        logd!("closing the old page failed: {e}");
                    }
                    summary.page_resets += 1;
                }
                Err(e) => loge!("could not recreate the page, keeping the old one: {e}"),
            }
            consecutive_failures = 0;
        }

        summary.tally(&result);
        progress.url_done(i, &result);
        results.push(result);

        if i + 1 < entries.len() {
            sleep(pause).await;
        }
    }

    if let Err(e) = page.close().await {
        logd!("closing the page failed: {e}");
    }
    progress.finish();
    Ok((results, summary))
}
