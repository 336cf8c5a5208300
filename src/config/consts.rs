// src/config/consts.rs

// Working directories
pub const INPUT_DIR: &str = "input";
pub const OUTPUT_DIR: &str = "output";
pub const LOG_DIR: &str = "logs";
pub const DEFAULT_URL_FILE: &str = "urls.txt";
pub const DEFAULT_KEYWORDS_PATH: &str = "config/keywords.json";

// Waits (ms)
pub const DEFAULT_WAIT_MS: u64 = 3000;
pub const DYNAMIC_WAIT_FLOOR_MS: u64 = 10_000;
pub const POLL_INTERVAL_MS: u64 = 500;
pub const NAV_TIMEOUT_MS: u64 = 15_000;
pub const FOLLOW_TIMEOUT_MS: u64 = 10_000;

// Loop
pub const FAILURE_THRESHOLD: u32 = 3; // consecutive URL failures before the page is recreated

// Validators
pub const DEFAULT_MIN_SHAREHOLDER_TEXT: usize = 15;
pub const FINANCIAL_YEAR_FLOOR: i32 = 2000;

// Search probe
pub const PROBE_QUERY: &str = "IR";
pub const SEARCH_RESULT_INDICATORS: [&str; 8] =
    ["検索結果", "search results", "検索", "search", "results", "件", "件数", "count"];

// 404 heuristics
pub const NOT_FOUND_TITLE_MARKERS: [&str; 2] = ["404", "Not Found"];
pub const NOT_FOUND_BODY_MARKERS: [&str; 3] =
    ["404 Not Found", "ページが見つかりません", "ページが見つかりませんでした"];

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
