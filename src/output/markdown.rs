//! Markdown summary generation
//!
//! This module writes a human-readable overview of an audit: run metadata,
//! status and issue breakdowns, noise labels, duplicate clusters and the
//! link structure highlights.

use crate::analysis::Severity;
use crate::output::report::AuditReport;
use crate::output::stats::AuditStatistics;
use crate::output::traits::{OutputResult, ReportWriter};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Duplicate clusters listed before the summary truncates
const MAX_LISTED_CLUSTERS: usize = 20;

/// Orphan pages listed before the summary truncates
const MAX_LISTED_ORPHANS: usize = 50;

/// Writes the markdown summary file
pub struct MarkdownSummary {
    path: PathBuf,
}

impl MarkdownSummary {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReportWriter for MarkdownSummary {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write_report(&self, report: &AuditReport) -> OutputResult<()> {
        let stats = AuditStatistics::from_report(report);
        let markdown = format_markdown_summary(report, &stats);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        tracing::info!("Wrote markdown summary to {}", self.path.display());
        Ok(())
    }
}

/// Formats an audit report as markdown
///
/// # Arguments
///
/// * `report` - The assembled report
/// * `stats` - Statistics computed from the same report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(report: &AuditReport, stats: &AuditStatistics) -> String {
    let mut md = String::new();
    let run = &report.run;

    md.push_str("# Site Audit Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", run.start_url));
    md.push_str(&format!("- **Host**: {}\n", run.host));
    md.push_str(&format!("- **Started**: {}\n", run.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", run.finished_at.to_rfc3339()));
    let duration = (run.finished_at - run.started_at).num_seconds().max(0);
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!("- **Noise Policy**: {}\n", run.noise_policy));
    if !run.config_hash.is_empty() {
        md.push_str(&format!("- **Config Hash**: {}\n", run.config_hash));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages**: {}\n", stats.total_pages));
    md.push_str(&format!("- **Non-HTML Pages**: {}\n", stats.non_html_pages));
    md.push_str(&format!("- **Internal Links**: {}\n", stats.total_edges));
    md.push_str(&format!("- **Orphan Pages**: {}\n", stats.orphan_urls.len()));
    md.push_str(&format!("- **Hreflang Alternates**: {}\n", report.hreflang.len()));
    md.push_str(&format!("- **Images**: {}\n", report.images.len()));
    md.push_str(&format!(
        "- **Pages with Performance Scores**: {}\n\n",
        stats.scored_pages
    ));

    md.push_str("## Status Breakdown\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    for (class, count) in &stats.pages_by_status {
        md.push_str(&format!("| {} | {} |\n", class, count));
    }
    md.push('\n');

    md.push_str("## Issues\n\n");
    md.push_str(&format!("- **Total Findings**: {}\n\n", stats.total_issues));
    md.push_str("| Top Severity | Pages |\n");
    md.push_str("|--------------|-------|\n");
    for severity in Severity::ALL.iter().rev() {
        let count = stats.pages_by_top_severity.get(severity).copied().unwrap_or(0);
        md.push_str(&format!("| {} | {} |\n", severity, count));
    }
    md.push('\n');

    if !stats.noise_by_reason.is_empty() {
        md.push_str("## Noise Pages\n\n");
        md.push_str("| Reason | Pages |\n");
        md.push_str("|--------|-------|\n");
        for (reason, count) in &stats.noise_by_reason {
            md.push_str(&format!("| {} | {} |\n", reason, count));
        }
        md.push('\n');
    }

    md.push_str("## Duplicate Content\n\n");
    if report.duplicates.is_empty() {
        md.push_str("No exact duplicates found.\n\n");
    } else {
        md.push_str(&format!(
            "{} clusters covering {} pages.\n\n",
            stats.duplicate_clusters, stats.duplicate_pages
        ));
        for cluster in report.duplicates.iter().take(MAX_LISTED_CLUSTERS) {
            let short_hash: String = cluster.body_hash.chars().take(12).collect();
            md.push_str(&format!("- `{}` ({} pages)\n", short_hash, cluster.urls.len()));
            for url in &cluster.urls {
                md.push_str(&format!("  - {}\n", url));
            }
        }
        if report.duplicates.len() > MAX_LISTED_CLUSTERS {
            md.push_str(&format!(
                "\n_...and {} more clusters_\n",
                report.duplicates.len() - MAX_LISTED_CLUSTERS
            ));
        }
        md.push('\n');
    }

    if !stats.top_inlinked.is_empty() {
        md.push_str("## Most Linked Pages\n\n");
        md.push_str("| URL | Inlinks |\n");
        md.push_str("|-----|---------|\n");
        for (url, inlinks) in &stats.top_inlinked {
            md.push_str(&format!("| {} | {} |\n", url, inlinks));
        }
        md.push('\n');
    }

    if !stats.orphan_urls.is_empty() {
        md.push_str("## Orphan Pages\n\n");
        for url in stats.orphan_urls.iter().take(MAX_LISTED_ORPHANS) {
            md.push_str(&format!("- {}\n", url));
        }
        if stats.orphan_urls.len() > MAX_LISTED_ORPHANS {
            md.push_str(&format!(
                "\n_...and {} more_\n",
                stats.orphan_urls.len() - MAX_LISTED_ORPHANS
            ));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(&format!(
        "_Generated by site-auditor v{}_\n",
        env!("CARGO_PKG_VERSION")
    ));

    md
}
