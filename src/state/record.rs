//! Per-page records produced by the crawl

use crate::url::ParamRisk;

/// An image referenced by a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Absolute image URL
    pub src: String,
    /// Trimmed alt text (empty when missing)
    pub alt: String,
    /// Last path segment of `src`, percent-decoded
    pub filename: String,
}

/// A directed hyperlink between two in-scope URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub anchor: String,
    /// Comma-joined rel tokens
    pub rel: String,
}

/// Performance and Core Web Vitals fields, filled by the optional
/// performance pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceScores {
    pub mobile_score: Option<u8>,
    pub desktop_score: Option<u8>,
    pub lcp_ms: Option<u64>,
    pub inp_ms: Option<u64>,
    pub cls: Option<f64>,
}

impl PerformanceScores {
    pub fn has_score(&self) -> bool {
        self.mobile_score.is_some() || self.desktop_score.is_some()
    }
}

/// Everything recorded about one fetched URL
///
/// Failed fetches produce a minimal record: `url` and `final_url` are the
/// requested URL, `status` is `None`, every other field keeps its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRecord {
    /// URL as requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status: Option<u16>,
    pub content_type: String,
    /// Content-Length header value, when sent
    pub content_length: Option<u64>,

    pub title: String,
    pub meta_description: String,
    /// Absolute canonical URL, empty when the page declares none
    pub canonical: String,
    pub meta_robots: String,
    pub x_robots_tag: String,
    pub h1: String,
    pub h2: String,

    pub word_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,

    /// Filled after the link graph is built
    pub inlinks: usize,
    /// Filled after the link graph is built
    pub outlinks: usize,

    pub hreflang_count: usize,
    /// JSON-LD `@type` values, sorted and deduplicated
    pub structured_data_types: Vec<String>,

    pub https: bool,
    /// Images served over http on an https page
    pub mixed_content: usize,
    pub hsts: bool,
    pub cache_control: String,
    pub vary: String,
    pub charset: String,
    pub x_content_type_options: String,
    /// `None` for minimal records
    pub param_risk: Option<ParamRisk>,

    /// SHA-256 hex digest of the normalized visible text
    pub body_hash: String,
    pub images: Vec<ImageInfo>,
    pub performance: PerformanceScores,
}

impl PageRecord {
    /// Creates the record stored when a fetch fails
    pub fn minimal(url: &str) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            ..Self::default()
        }
    }

    /// Returns true if the response was parsed as HTML
    pub fn is_html(&self) -> bool {
        self.content_type.to_lowercase().contains("text/html")
    }

    /// Structured data types joined for display
    pub fn structured_data_label(&self) -> String {
        self.structured_data_types.join(",")
    }

    /// Parameter risk label, empty for minimal records
    pub fn param_risk_label(&self) -> String {
        self.param_risk.map(|risk| risk.to_string()).unwrap_or_default()
    }
}
