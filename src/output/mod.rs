//! Output module for exporting audit results
//!
//! This module handles:
//! - Assembling the report with the noise policy applied
//! - Exporting every table to SQLite
//! - Writing the markdown summary and console statistics

mod markdown;
mod report;
mod schema;
mod sqlite_output;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, MarkdownSummary};
pub use report::{AuditReport, HreflangRow, PageRow, RunInfo};
pub use sqlite_output::SqliteExporter;
pub use stats::{print_statistics, AuditStatistics, StatusClass};
pub use traits::{OutputError, OutputResult, ReportWriter};

/// Runs every writer over the report, stopping at the first failure
pub fn write_all(report: &AuditReport, writers: &[&dyn ReportWriter]) -> OutputResult<()> {
    for writer in writers {
        tracing::debug!("Writing {} output", writer.name());
        writer.write_report(report)?;
    }
    Ok(())
}
