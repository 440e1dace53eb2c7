//! Site Auditor: a bounded breadth-first website auditor
//!
//! This crate crawls a single site, records one structured record per page,
//! derives the internal link graph, groups exact duplicates by body hash and
//! scores every page against title/description/image heuristics. Results are
//! assembled into an [`output::AuditReport`] for export.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod graph;
pub mod noise;
pub mod output;
pub mod performance;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for auditor operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Invalid start URL: {0}")]
    InvalidStartUrl(String),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_audit_crawl, Coordinator};
pub use noise::{classify, NoisePolicy, NoiseReason, NoiseVerdict};
pub use state::{CrawlSession, Edge, ImageInfo, PageRecord};
