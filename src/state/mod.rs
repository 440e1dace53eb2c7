//! Audit data model
//!
//! # Components
//!
//! - `PageRecord`: everything recorded about one fetched URL
//! - `ImageInfo`: an image referenced by a page
//! - `Edge`: an in-scope hyperlink
//! - `CrawlSession`: the ordered page collection, edges and hreflang map of one run

mod record;
mod session;

// Re-export main types
pub use record::{Edge, ImageInfo, PageRecord, PerformanceScores};
pub use session::CrawlSession;
