//! Report writer trait and output errors

use crate::output::report::AuditReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for an assembled audit report
///
/// Writers receive the report after the noise policy has been applied and
/// must not filter it further.
pub trait ReportWriter {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Writes the complete report
    ///
    /// # Arguments
    ///
    /// * `report` - The assembled report
    fn write_report(&self, report: &AuditReport) -> OutputResult<()>;
}
