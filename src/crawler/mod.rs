//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and header extraction
//! - HTML parsing for metadata, images and links
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_audit_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchedPage, MAX_REDIRECTS};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::{hash_text, normalize_whitespace, parse_page, DiscoveredLink, ParsedPage, MAX_ANCHOR_CHARS};
