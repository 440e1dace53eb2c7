use crate::noise::NoisePolicy;
use crate::performance::Strategy;
use serde::Deserialize;

/// Main configuration structure for the auditor
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    pub output: OutputConfig,
}

/// Crawl bounds and scoping
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the breadth-first traversal starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of page records produced by a run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the start URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fixed delay between requests (milliseconds)
    #[serde(rename = "delay-ms", default)]
    pub delay_ms: u64,

    /// Restrict traversal to the exact start host (false admits the whole site)
    #[serde(rename = "same-host", default = "default_true")]
    pub same_host: bool,

    /// Keep query parameters in the frontier dedup key
    #[serde(rename = "include-params", default)]
    pub include_params: bool,

    #[serde(rename = "noise-policy", default)]
    pub noise_policy: NoisePolicy,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    #[serde(rename = "contact-url")]
    pub contact_url: String,

    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteAuditor".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/site-auditor".to_string(),
            contact_email: "audits@example.com".to_string(),
        }
    }
}

/// Length guidance used by the issue and quality checks
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(rename = "title-min", default = "default_title_min")]
    pub title_min: usize,

    #[serde(rename = "title-max", default = "default_title_max")]
    pub title_max: usize,

    #[serde(rename = "meta-min", default = "default_meta_min")]
    pub meta_min: usize,

    #[serde(rename = "meta-max", default = "default_meta_max")]
    pub meta_max: usize,

    #[serde(rename = "alt-min", default = "default_alt_min")]
    pub alt_min: usize,

    #[serde(rename = "alt-max", default = "default_alt_max")]
    pub alt_max: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            title_min: default_title_min(),
            title_max: default_title_max(),
            meta_min: default_meta_min(),
            meta_max: default_meta_max(),
            alt_min: default_alt_min(),
            alt_max: default_alt_max(),
        }
    }
}

/// Optional performance-scoring pass
#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    /// API key; the pass is skipped when absent
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Number of most-inlinked pages to score
    #[serde(rename = "max-urls", default = "default_psi_max_urls")]
    pub max_urls: usize,

    /// Fixed delay after every API call (milliseconds)
    #[serde(rename = "delay-ms", default = "default_psi_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,

    #[serde(default = "default_psi_endpoint")]
    pub endpoint: String,

    /// Lighthouse audit used for INP when no field metric is reported.
    /// An empty string disables the proxy.
    #[serde(rename = "inp-proxy-audit", default = "default_inp_proxy_audit")]
    pub inp_proxy_audit: String,

    #[serde(rename = "timeout-secs", default = "default_psi_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_urls: default_psi_max_urls(),
            delay_ms: default_psi_delay_ms(),
            strategies: default_strategies(),
            endpoint: default_psi_endpoint(),
            inp_proxy_audit: default_inp_proxy_audit(),
            timeout_secs: default_psi_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite export file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

fn default_max_pages() -> usize {
    2000
}

fn default_max_depth() -> u32 {
    6
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_true() -> bool {
    true
}

fn default_title_min() -> usize {
    50
}

fn default_title_max() -> usize {
    60
}

fn default_meta_min() -> usize {
    140
}

fn default_meta_max() -> usize {
    155
}

fn default_alt_min() -> usize {
    100
}

fn default_alt_max() -> usize {
    125
}

fn default_psi_max_urls() -> usize {
    50
}

fn default_psi_delay_ms() -> u64 {
    250
}

fn default_strategies() -> Vec<Strategy> {
    vec![Strategy::Mobile, Strategy::Desktop]
}

fn default_psi_endpoint() -> String {
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed".to_string()
}

fn default_inp_proxy_audit() -> String {
    "interactive".to_string()
}

fn default_psi_timeout_secs() -> u64 {
    30
}
