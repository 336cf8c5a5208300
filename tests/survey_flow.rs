// tests/survey_flow.rs
mod common;

use common::*;
use ir_survey::config::Mode;
use ir_survey::engine::{Feature, SurveyResult, Surveyor};
use ir_survey::progress::NullProgress;

const ORIGIN: &str = "https://www.acme.co.jp/ir/";
const MESSAGE: &str = "https://www.acme.co.jp/ir/message/";
const OFFICER: &str = "https://www.acme.co.jp/company/officer/";
const LIBRARY: &str = "https://www.acme.co.jp/ir/library/";
const HIGHLIGHT: &str = "https://www.acme.co.jp/ir/highlight/";
const DIVIDEND: &str = "https://www.acme.co.jp/ir/stock/dividend/";
const ENGLISH: &str = "https://www.acme.co.jp/en/ir/";
const SUSTAINABILITY: &str = "https://www.acme.co.jp/sustainability/";

fn origin_doc() -> FakeDoc {
    let kw = keywords();
    FakeDoc::new("IR情報 | Acme", "株主・投資家の皆様へ")
        .element(r#"input[type="search"]"#, visible("input"))
        .element(&kw.sustainability.selectors.join(", "), anchor("会社情報", "https://www.acme.co.jp/company/"))
        .element(&kw.sustainability.selectors.join(", "), anchor("サステナビリティ", SUSTAINABILITY))
        .element(r#"a[href*="/en/"]"#, anchor("English", ENGLISH))
        .link("https://www.acme.co.jp/company/", "会社情報")
        .link(MESSAGE, "トップメッセージ")
        .link(OFFICER, "役員一覧")
        .link(LIBRARY, "IRライブラリ")
        .link(HIGHLIGHT, "財務ハイライト")
        .link(DIVIDEND, "配当・株主還元")
        .link(ENGLISH, "English")
}

fn message_doc() -> FakeDoc {
    let body = format!(
        "社長メッセージ 代表取締役社長 山田太郎 2025年6月27日 {}",
        "持続的な成長と企業価値の向上に取り組んでまいります。".repeat(12)
    );
    FakeDoc::new("トップメッセージ", &body)
}

fn full_site() -> FakeSite {
    FakeSite::new()
        .page(ORIGIN, origin_doc())
        .page(MESSAGE, message_doc())
        .page(OFFICER, FakeDoc::new("役員一覧", "代表取締役社長 山田太郎 略歴 1985年4月 当社入社"))
        .page(
            LIBRARY,
            FakeDoc::new("IRライブラリ", "")
                .link("https://www.acme.co.jp/ir/library/ir2023.pdf", "統合報告書2023 (PDF)")
                .link("https://www.acme.co.jp/ir/library/ir2025.pdf", "統合報告書2025 (PDF)"),
        )
        .page(
            HIGHLIGHT,
            FakeDoc::new("財務ハイライト", "売上高の推移 2025年3月期").element("canvas", visible("canvas")),
        )
        .page(
            DIVIDEND,
            FakeDoc::new("配当・株主還元", "配当方針 当社は連結配当性向30%を目安として安定的な配当の継続に努めます。"),
        )
        .page(ENGLISH, FakeDoc::new("Investor Relations", "Investor Relations"))
}

async fn survey(site: &FakeSite, mode: Mode) -> SurveyResult {
    let kw = keywords();
    let opts = options(mode);
    let surveyor = Surveyor::new(&kw, &opts, clock());
    let mut page = site.open_at("about:blank");
    surveyor.investigate(&mut page, ORIGIN, &mut NullProgress).await.unwrap()
}

#[tokio::test]
async fn full_mode_finds_every_feature() {
    let site = full_site();
    let r = survey(&site, Mode::Full).await;

    for f in Feature::ALL {
        assert_eq!(r.value(f), 1, "{f:?}: {}", r.item(f).note);
    }
    assert!(r.unexplained().is_empty());
    assert_eq!(r.actual_url, ORIGIN);

    assert_eq!(r.item(Feature::IntegratedReport).hit_url, "https://www.acme.co.jp/ir/library/ir2025.pdf");
    assert_eq!(r.item(Feature::Sustainability).hit_url, SUSTAINABILITY);
    assert_eq!(r.item(Feature::English).hit_url, ENGLISH);
    assert_eq!(r.item(Feature::TopMessage).hit_url, MESSAGE);
    assert_eq!(r.item(Feature::Search).detected_element_type, "search-element");

    // ends back on the origin page
    assert_eq!(site.navigations().last().map(String::as_str), Some(ORIGIN));
}

#[tokio::test]
async fn primary_mode_never_follows_content_links() {
    let site = full_site();
    let r = survey(&site, Mode::Primary).await;

    assert_eq!(r.value(Feature::Search), 1);
    assert_eq!(r.value(Feature::English), 1);
    assert_eq!(r.value(Feature::Sustainability), 1);
    for f in [Feature::TopMessage, Feature::Profile, Feature::IntegratedReport, Feature::FinancialGraph, Feature::ShareholderReturn] {
        assert_eq!(r.value(f), 0);
        assert!(r.item(f).note.contains("一次予選では対象外"), "{}", r.item(f).note);
    }
    let navs = site.navigations();
    assert!(!navs.iter().any(|u| u == MESSAGE || u == DIVIDEND), "{navs:?}");
}

#[tokio::test]
async fn secondary_mode_skips_search_and_english() {
    let site = full_site();
    let r = survey(&site, Mode::Secondary).await;

    assert_eq!(r.value(Feature::Search), 0);
    assert!(r.item(Feature::Search).note.contains("二次予選では対象外"));
    assert!(r.item(Feature::English).note.contains("二次予選では対象外"));
    assert_eq!(r.value(Feature::ShareholderReturn), 1);
    assert!(!site.navigations().iter().any(|u| u == ENGLISH));
}

#[tokio::test]
async fn soft_404_origin_short_circuits() {
    let site = FakeSite::new()
        .page(ORIGIN, origin_doc())
        .redirect(ORIGIN, "https://www.acme.co.jp/404.html")
        .page("https://www.acme.co.jp/404.html", FakeDoc::new("404 Not Found", "ページが見つかりません"));
    let r = survey(&site, Mode::Full).await;

    assert_eq!(r.actual_url, "https://www.acme.co.jp/404.html");
    for f in Feature::ALL {
        assert_eq!(r.value(f), 0);
        assert!(r.item(f).note.contains("404"), "{f:?}: {}", r.item(f).note);
    }
    assert_eq!(site.navigations(), vec![ORIGIN.to_string()]);
}

#[tokio::test]
async fn weak_pages_are_rejected_with_reasons() {
    let site = full_site()
        .page(MESSAGE, FakeDoc::new("トップメッセージ", "社長メッセージ 2019年6月27日"))
        .page(HIGHLIGHT, FakeDoc::new("財務ハイライト", "売上高の推移 2025年3月期"))
        .page(DIVIDEND, FakeDoc::new("配当", "配当方針 30% 2025"))
        .page(OFFICER, FakeDoc::new("Not Found", "お探しのページは移動しました"));
    let r = survey(&site, Mode::Full).await;

    let message = r.item(Feature::TopMessage);
    assert_eq!(message.value, 0);
    assert!(message.note.contains("短すぎる"), "{}", message.note);

    let chart = r.item(Feature::FinancialGraph);
    assert_eq!(chart.value, 0);
    assert!(chart.note.contains("グラフ要素なし"), "{}", chart.note);

    assert_eq!(r.value(Feature::ShareholderReturn), 0);
    assert!(r.item(Feature::Profile).note.contains("404"));

    // the rest of the survey is unaffected
    assert_eq!(r.value(Feature::IntegratedReport), 1);
    assert!(r.unexplained().is_empty());
}

#[tokio::test]
async fn unreachable_link_costs_only_its_feature() {
    let site = full_site().unreachable(OFFICER);
    let r = survey(&site, Mode::Full).await;

    let profile = r.item(Feature::Profile);
    assert_eq!(profile.value, 0);
    assert!(profile.note.contains("到達できず"), "{}", profile.note);
    assert_eq!(r.value(Feature::TopMessage), 1);
    assert_eq!(r.value(Feature::FinancialGraph), 1);
}

#[tokio::test]
async fn missing_links_and_report_fallback_to_origin() {
    let origin = FakeDoc::new("IR情報", "株主・投資家の皆様へ")
        .link("https://www.acme.co.jp/ir/pdf/ar_2025.pdf", "アニュアルレポート2025（PDF）");
    let site = FakeSite::new().page(ORIGIN, origin);
    let r = survey(&site, Mode::Full).await;

    let report = r.item(Feature::IntegratedReport);
    assert_eq!(report.value, 1, "{}", report.note);
    assert!(report.note.contains("トップページ"));
    assert_eq!(report.hit_url, "https://www.acme.co.jp/ir/pdf/ar_2025.pdf");

    for f in [Feature::TopMessage, Feature::Profile, Feature::FinancialGraph, Feature::ShareholderReturn] {
        assert_eq!(r.item(f).note, format!("{}: リンク未検出", f.short()));
    }
    assert_eq!(r.item(Feature::Search).note, "サイト内検索: 未検出");
    assert_eq!(r.item(Feature::English).note, "英語版サイト: 未検出");
    assert_eq!(r.item(Feature::Sustainability).note, "サステナビリティメニュー: 未検出");
    assert!(r.unexplained().is_empty());
}

#[tokio::test]
async fn origin_navigation_failure_is_an_error() {
    let site = FakeSite::new().unreachable(ORIGIN);
    let kw = keywords();
    let opts = options(Mode::Full);
    let surveyor = Surveyor::new(&kw, &opts, clock());
    let mut page = site.open_at("about:blank");
    let err = surveyor.investigate(&mut page, ORIGIN, &mut NullProgress).await.unwrap_err();
    assert!(err.to_string().contains(ORIGIN));
}
