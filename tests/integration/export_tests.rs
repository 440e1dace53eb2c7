//! Integration tests for scoring and export
//!
//! Crawls a mock site, runs the performance pass against a mock API and
//! exports the report into a temporary SQLite file.

use crate::crawl_tests::{create_test_config, html_page, mount_page};
use rusqlite::Connection;
use site_auditor::config::load_config_with_hash;
use site_auditor::crawler::run_audit_crawl;
use site_auditor::noise::NoisePolicy;
use site_auditor::output::{
    write_all, AuditReport, MarkdownSummary, ReportWriter, SqliteExporter,
};
use site_auditor::performance::{PerformanceAugmenter, Strategy};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PSI_BODY: &str = r#"{
    "lighthouseResult": {
        "categories": {"performance": {"score": 0.91}},
        "audits": {
            "largest-contentful-paint": {"numericValue": 1800.4},
            "interactive": {"numericValue": 2400},
            "cumulative-layout-shift": {"numericValue": 0.02}
        }
    }
}"#;

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .expect("Count query failed")
}

#[tokio::test]
async fn test_performance_pass_scores_top_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    let home = format!("{}/", base);

    mount_page(&server, "/", html_page("Home", &["/a", "/"])).await;
    mount_page(&server, "/a", html_page("A", &["/"])).await;

    Mock::given(method("GET"))
        .and(path("/psi"))
        .and(query_param("url", home.as_str()))
        .and(query_param("strategy", "mobile"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PSI_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&home, "");
    config.performance.api_key = Some("test-key".to_string());
    config.performance.endpoint = format!("{}/psi", base);
    config.performance.strategies = vec![Strategy::Mobile];
    config.performance.max_urls = 1;
    config.performance.delay_ms = 0;

    let mut session = run_audit_crawl(&config).await.unwrap();
    let augmenter = PerformanceAugmenter::new(&config.performance, &config.user_agent).unwrap();
    let summary = augmenter.augment(&mut session).await;

    assert_eq!(summary.pages_selected, 1);
    assert_eq!(summary.calls_made, 1);
    assert_eq!(summary.calls_succeeded, 1);

    // home is linked from itself and from /a, so it ranks first
    let scores = &session.page(&home).unwrap().performance;
    assert_eq!(scores.mobile_score, Some(91));
    assert_eq!(scores.desktop_score, None);
    assert_eq!(scores.lcp_ms, Some(1800));
    assert_eq!(scores.inp_ms, Some(2400));
    assert_eq!(scores.cls, Some(0.02));

    let other = &session.page(&format!("{}/a", base)).unwrap().performance;
    assert!(!other.has_score());
}

#[tokio::test]
async fn test_performance_failure_leaves_fields_unset() {
    let server = MockServer::start().await;
    let base = server.uri();
    let home = format!("{}/", base);

    mount_page(&server, "/", html_page("Home", &[])).await;
    Mock::given(method("GET"))
        .and(path("/psi"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let mut config = create_test_config(&home, "");
    config.performance.api_key = Some("test-key".to_string());
    config.performance.endpoint = format!("{}/psi", base);
    config.performance.delay_ms = 0;

    let mut session = run_audit_crawl(&config).await.unwrap();
    let augmenter = PerformanceAugmenter::new(&config.performance, &config.user_agent).unwrap();
    let summary = augmenter.augment(&mut session).await;

    assert_eq!(summary.calls_made, 2);
    assert_eq!(summary.calls_failed(), 2);
    assert!(!session.pages()[0].performance.has_score());
}

#[tokio::test]
async fn test_crawl_and_export_to_sqlite() {
    let server = MockServer::start().await;
    let base = server.uri();
    let home = format!("{}/", base);

    let same_body = "<html><head><title>Twin</title></head><body><p>Same words here</p></body></html>";
    mount_page(
        &server,
        "/",
        html_page("Home", &["/twin-1", "/twin-2", "/policies/refund"]),
    )
    .await;
    mount_page(&server, "/twin-1", same_body.to_string()).await;
    mount_page(&server, "/twin-2", same_body.to_string()).await;

    let config = create_test_config(&home, "");
    let session = run_audit_crawl(&config).await.unwrap();
    let report = AuditReport::build(&session, &config.limits, NoisePolicy::Label);

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("audit.db");
    let md_path = dir.path().join("summary.md");
    let sqlite = SqliteExporter::new(&db_path);
    let markdown = MarkdownSummary::new(&md_path);
    write_all(&report, &[&sqlite, &markdown]).unwrap();

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count(&conn, "pages"), 3);
    assert_eq!(count(&conn, "edges"), 3);
    assert_eq!(count(&conn, "duplicates"), 2);

    let twin_title_issues: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM issues WHERE reason = 'Duplicate title'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(twin_title_issues, 2);

    let (inlinks, status): (i64, i64) = conn
        .query_row(
            "SELECT inlinks, status FROM pages WHERE final_url = ?1",
            rusqlite::params![format!("{}/twin-1", base)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((inlinks, status), (1, 200));

    let summary = std::fs::read_to_string(&md_path).unwrap();
    assert!(summary.contains("1 clusters covering 2 pages"));
}

#[tokio::test]
async fn test_exclude_policy_export() {
    let server = MockServer::start().await;
    let base = server.uri();
    let home = format!("{}/", base);

    mount_page(&server, "/", html_page("Home", &["/hidden", "/account/login"])).await;
    mount_page(
        &server,
        "/hidden",
        r#"<html><head><meta name="robots" content="noindex"><title>Hidden</title></head></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&home, r#"noise-policy = "exclude""#);
    let session = run_audit_crawl(&config).await.unwrap();
    assert_eq!(session.page_count(), 2);

    let report = AuditReport::build(&session, &config.limits, config.crawler.noise_policy);

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("audit.db");
    SqliteExporter::new(&db_path).write_report(&report).unwrap();

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count(&conn, "pages"), 1);

    // the /account edge is dropped, the edge to the noindex page is not
    let targets: Vec<String> = conn
        .prepare("SELECT target FROM edges")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(targets, vec![format!("{}/hidden", base)]);
}

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[crawler]
start-url = "https://shop.example.com/"
max-pages = 50
noise-policy = "exclude"

[limits]
title-min = 30
title-max = 65

[performance]
strategies = ["desktop"]

[output]
database-path = "audit.db"
summary-path = "summary.md"
"#
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    assert_eq!(config.crawler.max_pages, 50);
    assert_eq!(config.crawler.max_depth, 6);
    assert_eq!(config.crawler.noise_policy, NoisePolicy::Exclude);
    assert_eq!(config.limits.title_min, 30);
    assert_eq!(config.limits.meta_max, 155);
    assert_eq!(config.performance.strategies, vec![Strategy::Desktop]);
    assert!(config.performance.api_key.is_none());
    assert_eq!(hash.len(), 64);
}
