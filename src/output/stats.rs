//! Statistics derived from an assembled report
//!
//! This module computes headline counts for the markdown summary and the
//! `--stats` console output.

use crate::analysis::Severity;
use crate::graph::LinkGraph;
use crate::noise::NoiseReason;
use crate::output::report::AuditReport;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP status bucket of a page record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Other,
    /// No response was received
    Failed,
}

impl StatusClass {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(200..=299) => Self::Success,
            Some(300..=399) => Self::Redirect,
            Some(400..=499) => Self::ClientError,
            Some(500..=599) => Self::ServerError,
            Some(_) => Self::Other,
            None => Self::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "2xx",
            Self::Redirect => "3xx",
            Self::ClientError => "4xx",
            Self::ServerError => "5xx",
            Self::Other => "other",
            Self::Failed => "no response",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit statistics summary
#[derive(Debug, Clone, Default)]
pub struct AuditStatistics {
    /// Exported page records
    pub total_pages: u64,

    pub pages_by_status: BTreeMap<StatusClass, u64>,

    /// Records whose content type is not HTML
    pub non_html_pages: u64,

    /// Exported link occurrences
    pub total_edges: u64,

    /// Labelled noise pages by reason
    pub noise_by_reason: BTreeMap<NoiseReason, u64>,

    pub duplicate_clusters: u64,

    /// Pages belonging to any duplicate cluster
    pub duplicate_pages: u64,

    /// Pages with at least one issue, keyed by their top severity
    pub pages_by_top_severity: BTreeMap<Severity, u64>,

    pub total_issues: u64,

    /// Pages carrying a performance score for any strategy
    pub scored_pages: u64,

    /// Final URLs no exported edge points at, start page excluded
    pub orphan_urls: Vec<String>,

    /// Most-linked pages, highest first
    pub top_inlinked: Vec<(String, usize)>,
}

/// Number of pages listed under "top inlinked"
pub const TOP_INLINKED_LIMIT: usize = 10;

impl AuditStatistics {
    /// Computes statistics for a report
    pub fn from_report(report: &AuditReport) -> Self {
        let mut stats = Self {
            total_pages: report.pages.len() as u64,
            total_edges: report.edges.len() as u64,
            duplicate_clusters: report.duplicates.len() as u64,
            duplicate_pages: report.duplicates.iter().map(|c| c.urls.len() as u64).sum(),
            ..Self::default()
        };

        for row in &report.pages {
            let page = &row.record;
            *stats
                .pages_by_status
                .entry(StatusClass::from_status(page.status))
                .or_insert(0) += 1;

            if page.status.is_some() && !page.is_html() {
                stats.non_html_pages += 1;
            }
            if let Some(reason) = row.noise {
                *stats.noise_by_reason.entry(reason).or_insert(0) += 1;
            }
            if page.performance.has_score() {
                stats.scored_pages += 1;
            }
        }

        for page in &report.issues {
            *stats.pages_by_top_severity.entry(page.top_severity).or_insert(0) += 1;
            stats.total_issues += page.issues.len() as u64;
        }

        let graph = LinkGraph::from_edges(&report.edges);
        stats.orphan_urls = graph
            .orphans(report.pages.iter().map(|row| &row.record), &report.run.start_url)
            .into_iter()
            .map(|page| page.final_url.clone())
            .collect();

        let mut ranked: Vec<(String, usize)> = report
            .pages
            .iter()
            .map(|row| (row.record.final_url.clone(), graph.inlinks_of(&row.record.final_url)))
            .filter(|(_, inlinks)| *inlinks > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(TOP_INLINKED_LIMIT);
        stats.top_inlinked = ranked;

        stats
    }

    /// Count for one status bucket
    pub fn status_count(&self, class: StatusClass) -> u64 {
        self.pages_by_status.get(&class).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &AuditStatistics) {
    println!("=== Audit Statistics ===\n");

    println!("Overview:");
    println!("  Pages exported: {}", stats.total_pages);
    println!("  Non-HTML pages: {}", stats.non_html_pages);
    println!("  Internal links: {}", stats.total_edges);
    println!("  Orphan pages: {}", stats.orphan_urls.len());
    println!("  Pages with performance scores: {}", stats.scored_pages);
    println!();

    println!("Pages by Status:");
    for (class, count) in &stats.pages_by_status {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", class, count, percentage);
    }
    println!();

    if !stats.noise_by_reason.is_empty() {
        println!("Noise Pages:");
        for (reason, count) in &stats.noise_by_reason {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    println!(
        "Duplicates: {} clusters covering {} pages",
        stats.duplicate_clusters, stats.duplicate_pages
    );
    println!();

    println!("Issues ({} total):", stats.total_issues);
    for (severity, count) in stats.pages_by_top_severity.iter().rev() {
        println!("  {}: {} pages", severity, count);
    }
    println!();
}
