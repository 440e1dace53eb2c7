//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop:
//! - Seeding the frontier with the start URL
//! - Fetching one page at a time and storing its record
//! - Recording edges and admitting new URLs to the frontier
//! - Building the link graph once the frontier is exhausted

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchedPage};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::graph::LinkGraph;
use crate::noise::classify;
use crate::state::{CrawlSession, Edge, PageRecord};
use crate::url::{resolve_url, HostScope};
use crate::{AuditError, UrlError};
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    settings: CrawlerConfig,
    client: Client,
    scope: HostScope,
    frontier: Frontier,
    session: CrawlSession,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The auditor configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(AuditError)` - Invalid start URL or HTTP client construction failed
    pub fn new(config: &Config) -> Result<Self, AuditError> {
        let start = parse_start_url(&config.crawler.start_url)?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;

        let scope = HostScope::new(&start, config.crawler.same_host);
        let session = CrawlSession::new(start.as_str(), scope.start_host());
        let frontier = Frontier::new(start, config.crawler.include_params);

        Ok(Self {
            settings: config.crawler.clone(),
            client,
            scope,
            frontier,
            session,
        })
    }

    /// Runs the crawl to completion and returns the session
    ///
    /// The loop stops when the frontier is empty or the page cap is reached,
    /// whichever comes first. Fetch failures become minimal records; the
    /// loop itself never fails.
    pub async fn run(mut self) -> CrawlSession {
        tracing::info!(
            "Starting crawl of {} (max {} pages, depth {})",
            self.session.start_url(),
            self.settings.max_pages,
            self.settings.max_depth
        );

        let start_time = Instant::now();
        let delay = Duration::from_millis(self.settings.delay_ms);

        while self.session.page_count() < self.settings.max_pages {
            let Some(queued) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            self.process_url(queued).await;

            let pages = self.session.page_count();
            if pages % 10 == 0 {
                let rate = pages as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                    pages,
                    self.frontier.len(),
                    rate
                );
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        if self.session.page_count() >= self.settings.max_pages {
            tracing::info!(
                "Page cap of {} reached with {} URLs still queued",
                self.settings.max_pages,
                self.frontier.len()
            );
        }

        let (pages, edges) = self.session.pages_and_edges();
        let graph = LinkGraph::from_edges(edges);
        graph.apply(pages);

        tracing::info!(
            "Crawl completed: {} pages, {} edges in {:?}",
            self.session.page_count(),
            graph.edge_count(),
            start_time.elapsed()
        );

        self.session
    }

    /// Fetches one URL, stores its record and handles its links
    async fn process_url(&mut self, queued: QueuedUrl) {
        tracing::debug!("Fetching {} (depth {})", queued.url, queued.depth);

        let FetchedPage {
            record,
            links,
            hreflang,
        } = match fetch_page(&self.client, &queued.url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", queued.url, e);
                FetchedPage {
                    record: PageRecord::minimal(queued.url.as_str()),
                    links: Vec::new(),
                    hreflang: Vec::new(),
                }
            }
        };

        let source = record.final_url.clone();
        let base = Url::parse(&source).unwrap_or_else(|_| queued.url.clone());

        self.session.insert_page(record);
        self.session.set_hreflang(&source, hreflang);

        for link in links {
            let Some(target) = resolve_url(&link.href, &base) else {
                tracing::trace!("Skipping href {:?} on {}", link.href, source);
                continue;
            };

            if !self.scope.contains(&target) {
                continue;
            }

            self.session.add_edge(Edge {
                source: source.clone(),
                target: target.to_string(),
                anchor: link.anchor,
                rel: link.rel,
            });

            if self.should_enqueue(&target, queued.depth) {
                self.frontier.push(target, queued.depth + 1);
            }
        }
    }

    /// Decides whether a discovered in-scope URL joins the frontier
    ///
    /// Dedup against the frontier happens in `Frontier::push`.
    fn should_enqueue(&self, target: &Url, depth: u32) -> bool {
        if depth >= self.settings.max_depth {
            return false;
        }
        if self.session.page_count() >= self.settings.max_pages {
            return false;
        }
        if !self.settings.noise_policy.filters_crawl() {
            return true;
        }

        let verdict = classify(target, "", "");
        if verdict.is_noise() {
            tracing::trace!("Not following {} ({})", target, verdict.reason_str());
        }
        !verdict.is_noise()
    }
}

/// Parses and checks the configured start URL
fn parse_start_url(raw: &str) -> Result<Url, AuditError> {
    let start = Url::parse(raw.trim())
        .map_err(|e| AuditError::InvalidStartUrl(format!("{}: {}", raw, e)))?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(UrlError::InvalidScheme(start.scheme().to_string()).into());
    }
    if start.host_str().is_none() {
        return Err(UrlError::MissingHost.into());
    }

    let mut start = start;
    start.set_fragment(None);
    Ok(start)
}

/// Runs a complete crawl
///
/// # Arguments
///
/// * `config` - The auditor configuration
///
/// # Returns
///
/// * `Ok(CrawlSession)` - Pages, edges (with link counts applied) and hreflang map
/// * `Err(AuditError)` - The crawl could not start
///
/// # Example
///
/// ```no_run
/// use site_auditor::config::load_config;
/// use site_auditor::crawler::run_audit_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("audit.toml"))?;
/// let session = run_audit_crawl(&config).await?;
/// println!("{} pages", session.page_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_audit_crawl(config: &Config) -> Result<CrawlSession, AuditError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
