//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! breadth-first crawl end-to-end.

use site_auditor::config::{parse_config, Config};
use site_auditor::crawler::run_audit_crawl;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `start_url`
///
/// `extra` is appended to the `[crawler]` table.
pub fn create_test_config(start_url: &str, extra: &str) -> Config {
    let toml = format!(
        r#"
[crawler]
start-url = "{}"
timeout-secs = 5
{}

[output]
database-path = "./unused.db"
summary-path = "./unused.md"
"#,
        start_url, extra
    );
    parse_config(&toml).expect("Failed to parse test config")
}

/// HTML page with a title and one anchor per href
pub fn html_page(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1>{}</body></html>",
        title, title, links
    )
}

/// Mounts an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

/// Request paths in the order the server received them
async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_home_product_and_cart() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/products/a", "/cart"])).await;
    mount_page(&server, "/products/a", html_page("Product A", &[])).await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", base), "max-depth = 1");
    let session = run_audit_crawl(&config).await.expect("Crawl should start");

    assert_eq!(session.page_count(), 2);
    let home = session.page(&format!("{}/", base)).expect("Home page recorded");
    assert_eq!(home.status, Some(200));
    assert_eq!(home.title, "Home");
    assert_eq!(home.outlinks, 2);

    let product = session
        .page(&format!("{}/products/a", base))
        .expect("Product page recorded");
    assert_eq!(product.inlinks, 1);

    let targets: Vec<&str> = session.edges().iter().map(|e| e.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![format!("{}/products/a", base).as_str(), format!("{}/cart", base).as_str()]
    );
    assert!(session.page(&format!("{}/cart", base)).is_none());
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/a", "/b"])).await;
    mount_page(&server, "/a", html_page("A", &["/a1"])).await;
    mount_page(&server, "/b", html_page("B", &["/b1"])).await;
    mount_page(&server, "/a1", html_page("A1", &[])).await;
    mount_page(&server, "/b1", html_page("B1", &[])).await;

    let config = create_test_config(&format!("{}/", base), "");
    let session = run_audit_crawl(&config).await.unwrap();

    assert_eq!(request_paths(&server).await, vec!["/", "/a", "/b", "/a1", "/b1"]);

    let crawled: Vec<&str> = session.pages().iter().map(|p| p.final_url.as_str()).collect();
    assert_eq!(crawled.len(), 5);
    assert!(crawled[0].ends_with('/'));
    assert!(crawled[4].ends_with("/b1"));
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", &["/a", "/a#reviews", "/a?utm_source=mail", "/b"]),
    )
    .await;
    mount_page(&server, "/b", html_page("B", &["/a", "/"])).await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page("A", &["/"]), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", base), "");
    let session = run_audit_crawl(&config).await.unwrap();

    assert_eq!(session.page_count(), 3);

    // edges keep their query string, so only the three plain /a links count
    let a = session.page(&format!("{}/a", base)).unwrap();
    assert_eq!(a.inlinks, 3);
    assert!(session
        .edges()
        .iter()
        .any(|e| e.target == format!("{}/a?utm_source=mail", base)));
}

#[tokio::test]
async fn test_max_pages_bound() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/p1", "/p2", "/p3", "/p4", "/p5"])).await;
    for route in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        mount_page(&server, route, html_page(route, &[])).await;
    }

    let config = create_test_config(&format!("{}/", base), "max-pages = 3");
    let session = run_audit_crawl(&config).await.unwrap();

    assert_eq!(session.page_count(), 3);
    assert_eq!(request_paths(&server).await, vec!["/", "/p1", "/p2"]);
}

#[tokio::test]
async fn test_edges_recorded_at_max_depth() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/a"])).await;
    mount_page(&server, "/a", html_page("A", &["/deep"])).await;

    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", base), "max-depth = 1");
    let session = run_audit_crawl(&config).await.unwrap();

    assert_eq!(session.page_count(), 2);
    assert!(session
        .edges()
        .iter()
        .any(|e| e.source == format!("{}/a", base) && e.target == format!("{}/deep", base)));
}

#[tokio::test]
async fn test_non_html_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/catalog.pdf"])).await;
    Mock::given(method("GET"))
        .and(path("/catalog.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4 <a href=\"/x\">", "application/pdf"))
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", base), "");
    let session = run_audit_crawl(&config).await.unwrap();

    let pdf = session.page(&format!("{}/catalog.pdf", base)).unwrap();
    assert_eq!(pdf.status, Some(200));
    assert!(!pdf.is_html());
    assert!(pdf.title.is_empty());
    assert_eq!(pdf.outlinks, 0);
    assert_eq!(session.page_count(), 2);
}

#[tokio::test]
async fn test_redirect_records_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/old"])).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    mount_page(&server, "/new", html_page("New", &[])).await;

    let config = create_test_config(&format!("{}/", base), "");
    let session = run_audit_crawl(&config).await.unwrap();

    let page = session.page(&format!("{}/new", base)).expect("Final URL recorded");
    assert_eq!(page.url, format!("{}/old", base));
    assert_eq!(page.status, Some(200));
    assert_eq!(page.title, "New");
}

#[tokio::test]
async fn test_error_status_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/gone"])).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("<title>Missing</title>", "text/html"))
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", base), "");
    let session = run_audit_crawl(&config).await.unwrap();

    let gone = session.page(&format!("{}/gone", base)).unwrap();
    assert_eq!(gone.status, Some(404));
}

#[tokio::test]
async fn test_unreachable_start_yields_minimal_record() {
    let config = create_test_config("http://127.0.0.1:1/", "");
    let session = run_audit_crawl(&config).await.expect("Crawl never fails on fetch errors");

    assert_eq!(session.page_count(), 1);
    let page = &session.pages()[0];
    assert_eq!(page.url, "http://127.0.0.1:1/");
    assert_eq!(page.status, None);
    assert!(page.title.is_empty());
    assert!(session.edges().is_empty());
}

#[tokio::test]
async fn test_timed_out_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/slow", "/ok"])).await;
    mount_page(&server, "/ok", html_page("Ok", &[])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Slow", &[]), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&format!("{}/", base), "");
    config.crawler.timeout_secs = 1;
    let session = run_audit_crawl(&config).await.expect("Crawl never fails on fetch errors");

    assert_eq!(session.page_count(), 3);

    let slow = session.page(&format!("{}/slow", base)).expect("Slow page recorded");
    assert_eq!(slow.status, None);
    assert!(slow.title.is_empty());

    let ok = session.page(&format!("{}/ok", base)).expect("Sibling page recorded");
    assert_eq!(ok.status, Some(200));
    assert_eq!(ok.title, "Ok");
    assert_eq!(ok.inlinks, 1);
}

#[tokio::test]
async fn test_invalid_start_url_fails() {
    let mut config = create_test_config("https://example.com/", "");
    config.crawler.start_url = "mailto:someone@example.com".to_string();
    assert!(run_audit_crawl(&config).await.is_err());
}

#[tokio::test]
async fn test_ignore_policy_follows_noise_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Home", &["/cart"])).await;
    mount_page(&server, "/cart", html_page("Cart", &[])).await;

    let config = create_test_config(&format!("{}/", base), r#"noise-policy = "ignore""#);
    let session = run_audit_crawl(&config).await.unwrap();

    assert!(session.page(&format!("{}/cart", base)).is_some());
}
