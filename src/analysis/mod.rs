//! Duplicate and quality analysis
//!
//! - `duplicates`: exact-content clusters by body hash
//! - `issues`: title and description findings with severities
//! - `quality`: per-page metrics and per-image hygiene

mod duplicates;
mod issues;
mod quality;

pub use duplicates::{content_hash_index, duplicate_clusters, DuplicateCluster};
pub use issues::{build_issues, ends_with_separator, Issue, IssueKind, PageIssues, Severity};
pub use quality::{build_quality, has_good_extension, ImageDetail, QualityRecord};
