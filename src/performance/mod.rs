//! Optional performance pass
//!
//! Queries the PageSpeed Insights API for the most-linked pages and stores
//! the performance score and Core Web Vitals on their records. Every failure
//! is logged and swallowed: a page that could not be scored keeps its
//! previous values.

mod psi;

pub use psi::{Measurement, PsiResponse, FIELD_INP_METRIC};

use crate::config::{PerformanceConfig, UserAgentConfig};
use crate::crawler::build_http_client;
use crate::state::{CrawlSession, PageRecord};
use crate::AuditError;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Device profile used for a PageSpeed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts from one performance pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceSummary {
    /// True when no API key was configured
    pub skipped: bool,
    pub pages_selected: usize,
    pub calls_made: usize,
    pub calls_succeeded: usize,
}

impl PerformanceSummary {
    pub fn calls_failed(&self) -> usize {
        self.calls_made - self.calls_succeeded
    }
}

/// Scores the top pages of a crawl session
pub struct PerformanceAugmenter {
    client: Client,
    config: PerformanceConfig,
}

impl PerformanceAugmenter {
    /// Creates an augmenter with its own HTTP client
    pub fn new(config: &PerformanceConfig, user_agent: &UserAgentConfig) -> Result<Self, AuditError> {
        let client = build_http_client(user_agent, Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Returns true if an API key is configured
    pub fn is_enabled(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Scores the `max-urls` most-inlinked pages for every strategy
    ///
    /// Pages are ranked by inlink count, ties keep crawl order. A fixed
    /// delay follows every API call.
    pub async fn augment(&self, session: &mut CrawlSession) -> PerformanceSummary {
        let Some(api_key) = self.api_key() else {
            tracing::info!("No performance API key configured, skipping performance pass");
            return PerformanceSummary {
                skipped: true,
                ..PerformanceSummary::default()
            };
        };

        let targets = select_targets(session.pages(), self.config.max_urls);
        let delay = Duration::from_millis(self.config.delay_ms);
        let mut summary = PerformanceSummary {
            pages_selected: targets.len(),
            ..PerformanceSummary::default()
        };

        tracing::info!(
            "Scoring {} pages with {} strategies",
            targets.len(),
            self.config.strategies.len()
        );

        for index in targets {
            let page_url = session.pages()[index].final_url.clone();

            for strategy in &self.config.strategies {
                summary.calls_made += 1;

                if let Some(measurement) = self.query(&page_url, *strategy, api_key).await {
                    apply_measurement(&mut session.pages_mut()[index], *strategy, measurement);
                    summary.calls_succeeded += 1;
                }

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        tracing::info!(
            "Performance pass complete: {}/{} calls succeeded",
            summary.calls_succeeded,
            summary.calls_made
        );

        summary
    }

    /// One API call; `None` on any failure
    async fn query(&self, page_url: &str, strategy: Strategy, api_key: &str) -> Option<Measurement> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("url", page_url),
                ("strategy", strategy.as_str()),
                ("key", api_key),
            ])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Performance request failed for {} ({}): {}", page_url, strategy, e);
                return None;
            }
        };

        if response.status().as_u16() != 200 {
            tracing::debug!(
                "Performance API returned {} for {} ({})",
                response.status(),
                page_url,
                strategy
            );
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read performance response for {}: {}", page_url, e);
                return None;
            }
        };

        match serde_json::from_str::<PsiResponse>(&body) {
            Ok(parsed) => Some(parsed.measurement(&self.config.inp_proxy_audit)),
            Err(e) => {
                tracing::warn!("Invalid performance response for {}: {}", page_url, e);
                None
            }
        }
    }
}

/// Indices of the `limit` pages with the most inlinks, ties in crawl order
pub fn select_targets(pages: &[PageRecord], limit: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pages.len()).collect();
    order.sort_by(|&a, &b| pages[b].inlinks.cmp(&pages[a].inlinks));
    order.truncate(limit);
    order
}

/// Stores a measurement, keeping prior vitals the response lacks
fn apply_measurement(page: &mut PageRecord, strategy: Strategy, measurement: Measurement) {
    let scores = &mut page.performance;
    match strategy {
        Strategy::Mobile => scores.mobile_score = measurement.score,
        Strategy::Desktop => scores.desktop_score = measurement.score,
    }
    scores.lcp_ms = measurement.lcp_ms.or(scores.lcp_ms);
    scores.inp_ms = measurement.inp_ms.or(scores.inp_ms);
    scores.cls = measurement.cls.or(scores.cls);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, inlinks: usize) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            final_url: url.to_string(),
            inlinks,
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_select_targets_stable() {
        let pages = vec![
            page("https://e.com/a", 1),
            page("https://e.com/b", 5),
            page("https://e.com/c", 1),
            page("https://e.com/d", 5),
        ];
        assert_eq!(select_targets(&pages, 3), vec![1, 3, 0]);
        assert_eq!(select_targets(&pages, 10).len(), 4);
        assert!(select_targets(&pages, 0).is_empty());
    }

    #[test]
    fn test_apply_keeps_prior_vitals() {
        let mut record = page("https://e.com/", 0);
        apply_measurement(
            &mut record,
            Strategy::Mobile,
            Measurement {
                score: Some(72),
                lcp_ms: Some(2500),
                inp_ms: Some(200),
                cls: Some(0.1),
            },
        );
        apply_measurement(
            &mut record,
            Strategy::Desktop,
            Measurement {
                score: Some(95),
                lcp_ms: None,
                inp_ms: None,
                cls: None,
            },
        );

        assert_eq!(record.performance.mobile_score, Some(72));
        assert_eq!(record.performance.desktop_score, Some(95));
        assert_eq!(record.performance.lcp_ms, Some(2500));
        assert_eq!(record.performance.inp_ms, Some(200));
        assert_eq!(record.performance.cls, Some(0.1));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Mobile.to_string(), "mobile");
        assert_eq!(Strategy::Desktop.as_str(), "desktop");
    }

    #[tokio::test]
    async fn test_skipped_without_key() {
        let augmenter =
            PerformanceAugmenter::new(&PerformanceConfig::default(), &UserAgentConfig::default()).unwrap();
        let mut session = CrawlSession::new("https://e.com/", "e.com");
        session.insert_page(page("https://e.com/", 0));

        assert!(!augmenter.is_enabled());
        let summary = augmenter.augment(&mut session).await;
        assert!(summary.skipped);
        assert_eq!(summary.calls_made, 0);
    }
}
