// src/cli.rs
use std::path::PathBuf;

use crate::browser::ChromeSession;
use crate::config::{Keywords, Mode, OutputStyle, SurveyClock, SurveyOptions};
use crate::engine::{Feature, Surveyor};
use crate::error::RunError;
use crate::file::{normalize_separators, resolve_input_path};
use crate::progress::ConsoleProgress;
use crate::report::write_report;
use crate::runner::run_survey;
use crate::urls::load_url_list;

pub enum Command {
    Run(SurveyOptions),
    Help,
}

pub const HELP: &str = include_str!("cli_help.txt");

/// Parse everything after the program name. Flags take `--flag value` or `--flag=value`.
pub fn parse_args<I, S>(args: I) -> Result<Command, RunError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut opts = SurveyOptions::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(a) = args.next() {
        let (flag, inline) = match a.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (s!(f), Some(s!(v))),
            _ => (a.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, RunError> {
            match inline.clone() {
                Some(v) => Ok(v),
                None => args.next().ok_or_else(|| RunError::Args(format!("missing value for {name}"))),
            }
        };

        match flag.as_str() {
            "--file" | "-f" => opts.file = PathBuf::from(normalize_separators(&value("--file")?)),
            "--output" | "-o" => opts.output = Some(PathBuf::from(normalize_separators(&value("--output")?))),
            "--wait" | "-w" => {
                let v = value("--wait")?;
                opts.wait_ms = v.trim().parse().map_err(|_| RunError::Args(format!("invalid wait: {v}")))?;
            }
            "--mode" | "-m" => {
                let v = value("--mode")?;
                match v.to_ascii_lowercase().as_str() {
                    "full" => opts.mode = Mode::Full,
                    "primary" => opts.mode = Mode::Primary,
                    "secondary" => opts.mode = Mode::Secondary,
                    "compact" => {
                        opts.mode = Mode::Primary;
                        opts.output_style = OutputStyle::Compact;
                    }
                    other => return Err(RunError::Args(format!("unknown mode: {other}"))),
                }
            }
            "--output-style" | "--output-format" => {
                let v = value("--output-style")?;
                opts.output_style = match v.to_ascii_lowercase().as_str() {
                    "detailed" | "details" => OutputStyle::Detailed,
                    "compact" | "summary" => OutputStyle::Compact,
                    other => return Err(RunError::Args(format!("unknown output style: {other}"))),
                };
            }
            "--keywords" => opts.keywords_path = PathBuf::from(value("--keywords")?),
            "--log-dir" => opts.log_dir = PathBuf::from(value("--log-dir")?),
            "--headed" => opts.headless = false,
            "--dry-run" => opts.dry_run = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(RunError::Args(format!("unknown argument: {a}"))),
        }
    }

    Ok(Command::Run(opts))
}

/// Whole run: config, URL list, browser, survey, report.
pub async fn run(options: SurveyOptions) -> Result<(), RunError> {
    let clock = SurveyClock::now();
    let options = options.with_defaults(clock.started_at);

    let log = crate::log::init(&options.log_dir)
        .map_err(|source| RunError::Io { path: options.log_dir.clone(), source })?;
    logf!("log file: {}", log.path.display());

    let keywords = Keywords::load(&options.keywords_path)?;
    let file = resolve_input_path(&options.file);
    let entries = load_url_list(&file, None)?;
    let output = options.output.clone().unwrap_or_default();

    println!("{}", "=".repeat(60));
    println!("IR調査 ({})", options.mode.label());
    println!("URLファイル: {}", file.display());
    println!("出力ファイル: {}", output.display());
    println!("待機時間: {}ms", options.wait_ms);
    if options.dry_run {
        println!("モード: dry-run（実行なし）");
    }
    println!("{}", "=".repeat(60));
    println!("\n読み込んだURL数: {}件\n", entries.len());

    if entries.is_empty() {
        return Err(RunError::NoUrls(file));
    }

    if options.dry_run {
        for (i, e) in entries.iter().enumerate() {
            let code = e.code.as_deref().map(|c| format!("[{c}] ")).unwrap_or_default();
            println!("{:>4}. {code}{} {}", i + 1, e.name, e.url);
        }
        println!("Dry-run: URLリストと設定を確認しました。ブラウザ実行は行っていません。");
        return Ok(());
    }

    let mut session = ChromeSession::launch(options.headless).await?;
    let surveyor = Surveyor::new(&keywords, &options, clock);
    let mut progress = ConsoleProgress::default();

    let outcome = run_survey(&mut session, &entries, &surveyor, options.timing.between_urls, &mut progress).await;
    session.shutdown().await;
    let (results, summary) = outcome?;

    let written = write_report(&output, options.output_style, &entries, &results)?;

    let features: Vec<Feature> = Feature::ALL.into_iter().filter(|f| f.in_mode(options.mode)).collect();
    println!();
    for line in summary.lines(&features) {
        println!("{line}");
        logf!("{line}");
    }
    if summary.page_resets > 0 {
        println!("ページ再作成: {}回", summary.page_resets);
    }
    println!("結果を保存しました: {}", written.display());
    Ok(())
}
