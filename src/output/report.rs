//! Report assembly
//!
//! Turns a finished crawl session into the rows every writer exports, with
//! the noise policy applied once:
//!
//! | Policy | Pages | Edges, duplicates, hreflang |
//! |--------|-------|-----------------------------|
//! | `label` | all, noise pages carry their reason | all |
//! | `exclude` | noise pages dropped | rows touching a noise URL dropped |
//! | `ignore` | all, unlabelled | all |
//!
//! Issues are computed over every crawled page and then filtered to the kept
//! pages, so a title shared with an excluded page is still a duplicate.
//! Quality records are computed over the kept pages only.

use crate::analysis::{
    build_issues, build_quality, duplicate_clusters, DuplicateCluster, ImageDetail, PageIssues,
    QualityRecord,
};
use crate::config::LimitsConfig;
use crate::noise::{classify_str, NoisePolicy, NoiseReason};
use crate::state::{CrawlSession, Edge, PageRecord};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Run metadata carried into every export
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub start_url: String,
    pub host: String,
    pub noise_policy: NoisePolicy,
    pub config_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// One exported page
#[derive(Debug, Clone)]
pub struct PageRow {
    pub record: PageRecord,
    /// Noise reason under the `label` policy
    pub noise: Option<NoiseReason>,
    /// Neither meta robots nor X-Robots-Tag says `nofollow`
    pub followable: bool,
    /// The canonical points at the page's own final URL
    pub self_canonical: bool,
}

impl PageRow {
    fn new(record: &PageRecord, noise: Option<NoiseReason>) -> Self {
        let nofollow = |value: &str| value.to_lowercase().contains("nofollow");
        Self {
            followable: !nofollow(&record.meta_robots) && !nofollow(&record.x_robots_tag),
            self_canonical: !record.canonical.is_empty() && record.canonical == record.final_url,
            record: record.clone(),
            noise,
        }
    }
}

/// One hreflang alternate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HreflangRow {
    pub source: String,
    pub lang: String,
    pub href: String,
}

/// Everything an export writes
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub run: RunInfo,
    pub pages: Vec<PageRow>,
    pub edges: Vec<Edge>,
    pub duplicates: Vec<DuplicateCluster>,
    pub hreflang: Vec<HreflangRow>,
    pub issues: Vec<PageIssues>,
    pub quality: Vec<QualityRecord>,
    pub images: Vec<ImageDetail>,
    noise_index: HashMap<String, NoiseReason>,
}

impl AuditReport {
    /// Assembles the report for a finished session
    ///
    /// Run timestamps default to now; callers overwrite `run` fields they
    /// track themselves.
    pub fn build(session: &CrawlSession, limits: &LimitsConfig, policy: NoisePolicy) -> Self {
        let labels = policy == NoisePolicy::Label;
        let excludes = policy == NoisePolicy::Exclude;

        let mut pages = Vec::with_capacity(session.page_count());
        let mut noise_index = HashMap::new();

        for record in session.pages() {
            let verdict = match policy {
                NoisePolicy::Ignore => Default::default(),
                _ => classify_str(&record.final_url, &record.meta_robots, &record.x_robots_tag),
            };

            if excludes && verdict.is_noise() {
                continue;
            }

            let noise = if labels { verdict.reason } else { None };
            if let Some(reason) = noise {
                noise_index.insert(record.final_url.clone(), reason);
            }
            pages.push(PageRow::new(record, noise));
        }

        // URL-only check used for edges, duplicate members and hreflang
        let keep = |url: &str| !excludes || !classify_str(url, "", "").is_noise();

        let edges: Vec<Edge> = session
            .edges()
            .iter()
            .filter(|edge| keep(&edge.source) && keep(&edge.target))
            .cloned()
            .collect();

        let duplicates = duplicate_clusters(session.pages())
            .into_iter()
            .filter_map(|cluster| {
                let urls: Vec<String> = cluster.urls.into_iter().filter(|u| keep(u)).collect();
                (urls.len() > 1).then(|| DuplicateCluster {
                    body_hash: cluster.body_hash,
                    urls,
                })
            })
            .collect();

        let hreflang = session
            .hreflang()
            .iter()
            .filter(|(source, _)| keep(source))
            .flat_map(|(source, pairs)| {
                pairs.iter().map(move |(lang, href)| HreflangRow {
                    source: source.clone(),
                    lang: lang.clone(),
                    href: href.clone(),
                })
            })
            .filter(|row| keep(&row.href))
            .collect();

        let kept_urls: HashSet<&str> = pages.iter().map(|row| row.record.final_url.as_str()).collect();
        let issues = build_issues(session.pages(), limits)
            .into_iter()
            .filter(|entry| kept_urls.contains(entry.url.as_str()))
            .collect();
        let (quality, images) = build_quality(pages.iter().map(|row| &row.record), limits);

        let now = Utc::now();
        Self {
            run: RunInfo {
                start_url: session.start_url().to_string(),
                host: session.host().to_string(),
                noise_policy: policy,
                config_hash: String::new(),
                started_at: now,
                finished_at: now,
            },
            pages,
            edges,
            duplicates,
            hreflang,
            issues,
            quality,
            images,
            noise_index,
        }
    }

    /// Noise label of an exported page
    pub fn noise_of(&self, url: &str) -> Option<NoiseReason> {
        self.noise_index.get(url).copied()
    }
}
