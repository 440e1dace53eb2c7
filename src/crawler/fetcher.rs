//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawl, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - One GET per URL with redirects followed
//! - Header-derived record fields
//! - Handing HTML bodies to the parser

use crate::config::UserAgentConfig;
use crate::crawler::parser::{parse_page, DiscoveredLink};
use crate::state::PageRecord;
use crate::url::param_risk;
use crate::AuditError;
use reqwest::header::{HeaderMap, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, STRICT_TRANSPORT_SECURITY, VARY};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed per request
pub const MAX_REDIRECTS: usize = 10;

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The page record, without inlink/outlink counts
    pub record: PageRecord,
    /// Raw links found on the page (empty for non-HTML responses)
    pub links: Vec<DiscoveredLink>,
    /// (lang, absolute href) alternates declared by the page
    pub hreflang: Vec<(String, String)>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_auditor::config::UserAgentConfig;
/// use site_auditor::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(20)).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL and builds its page record
///
/// # Request Flow
///
/// 1. Send one GET, following up to 10 redirects
/// 2. Record status and header-derived fields against the final URL
/// 3. Non-HTML content types stop here (not an error)
/// 4. HTML bodies are parsed for metadata, images and links
///
/// Decompressed and chunked responses carry no `Content-Length`; the length
/// then falls back to the byte length of the body read.
///
/// HTTP error statuses (404, 500, ...) are successful fetches with the
/// status recorded.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Request or body read timed out | `AuditError::Timeout` |
/// | Connection, TLS, redirect or body read failure | `AuditError::Http` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, AuditError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let final_url = response.url().clone();
    let headers = response.headers().clone();
    let content_type = header_str(&headers, CONTENT_TYPE.as_str());

    let mut record = PageRecord {
        url: url.to_string(),
        final_url: final_url.to_string(),
        status: Some(response.status().as_u16()),
        content_length: header_str(&headers, CONTENT_LENGTH.as_str()).trim().parse().ok(),
        charset: charset_of(&content_type),
        content_type,
        cache_control: header_str(&headers, CACHE_CONTROL.as_str()),
        vary: header_str(&headers, VARY.as_str()),
        x_content_type_options: header_str(&headers, "x-content-type-options"),
        x_robots_tag: header_str(&headers, "x-robots-tag"),
        hsts: !header_str(&headers, STRICT_TRANSPORT_SECURITY.as_str()).is_empty(),
        https: final_url.scheme() == "https",
        param_risk: Some(param_risk(&final_url)),
        ..PageRecord::default()
    };

    if !record.is_html() {
        tracing::debug!("Not HTML ({}): {}", record.content_type, final_url);
        if record.content_length.is_none() {
            record.content_length = response.bytes().await.ok().map(|body| body.len() as u64);
        }
        return Ok(FetchedPage {
            record,
            links: Vec::new(),
            hreflang: Vec::new(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    record.content_length = record.content_length.or(Some(body.len() as u64));
    let parsed = parse_page(&body, &final_url);

    record.title = parsed.title;
    record.meta_description = parsed.meta_description;
    record.meta_robots = parsed.meta_robots;
    record.canonical = parsed.canonical;
    record.h1 = parsed.h1;
    record.h2 = parsed.h2;
    record.hreflang_count = parsed.hreflang.len();
    record.structured_data_types = parsed.structured_data_types;
    record.word_count = parsed.word_count;
    record.body_hash = parsed.body_hash;
    record.image_count = parsed.images.len();
    record.images_missing_alt = parsed.images_missing_alt;
    record.mixed_content = parsed.mixed_content;
    record.images = parsed.images;

    Ok(FetchedPage {
        record,
        links: parsed.links,
        hreflang: parsed.hreflang,
    })
}

fn classify_error(url: &Url, error: reqwest::Error) -> AuditError {
    if error.is_timeout() {
        AuditError::Timeout {
            url: url.to_string(),
        }
    } else {
        AuditError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Header value as a string, empty when absent or not valid UTF-8
fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Extracts the `charset` parameter of a Content-Type value
fn charset_of(content_type: &str) -> String {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_lowercase())
        .unwrap_or_default()
}
