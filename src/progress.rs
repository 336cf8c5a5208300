// src/progress.rs
use crate::engine::types::{EvidenceItem, Feature, SurveyResult};

/// Progress reporting for a survey run. Frontends implement this to surface
/// status to users; the engine never prints on its own.
pub trait Progress {
    /// Called at the start with the number of URLs.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A URL (0-based `index`) is about to be investigated.
    fn url_started(&mut self, _index: usize, _url: &str) {}

    /// One feature of the current URL has its verdict.
    fn feature_done(&mut self, _feature: Feature, _item: &EvidenceItem) {}

    /// A URL is finished, successfully or as an error result.
    fn url_done(&mut self, _index: usize, _result: &SurveyResult) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Status lines on stdout, mirrored into the log.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        println!("調査対象: {total}件");
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
        logf!("{msg}");
    }

    fn url_started(&mut self, index: usize, url: &str) {
        println!("\n[{}/{}] {url}", index + 1, self.total);
        logf!("[{}/{}] {url}", index + 1, self.total);
    }

    fn feature_done(&mut self, feature: Feature, item: &EvidenceItem) {
        let mark = if item.is_found() { "✓" } else { "✗" };
        println!("  {mark} {}", item.note);
        logf!("{:?} = {} ({})", feature, item.value, item.note);
    }

    fn url_done(&mut self, _index: usize, result: &SurveyResult) {
        if let Some(err) = &result.error {
            println!("  エラー: {err}");
        }
    }

    fn finish(&mut self) {
        println!("\n調査完了");
    }
}
