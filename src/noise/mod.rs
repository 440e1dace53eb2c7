//! Noise classification for crawled URLs
//!
//! Storefront sites expose many crawlable areas that say nothing about
//! content quality: carts, customer accounts, app proxies, policy pages,
//! paginated blog indices and pages that opt out of indexing. This module
//! labels them so the crawl can skip them and exports can label or drop them.

use serde::Deserialize;
use std::fmt;
use url::Url;

/// Why a URL was classified as noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoiseReason {
    CartCheckout,
    Account,
    AdminApps,
    AuthRedirect,
    Policies,
    BlogIndex,
    Noindex,
}

impl NoiseReason {
    /// Every reason, in rule order
    pub const ALL: [NoiseReason; 7] = [
        Self::CartCheckout,
        Self::Account,
        Self::AdminApps,
        Self::AuthRedirect,
        Self::Policies,
        Self::BlogIndex,
        Self::Noindex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CartCheckout => "Cart/Checkout",
            Self::Account => "Account",
            Self::AdminApps => "Admin/Apps",
            Self::AuthRedirect => "Auth redirect",
            Self::Policies => "Policies",
            Self::BlogIndex => "Blog index",
            Self::Noindex => "Noindex",
        }
    }
}

impl fmt::Display for NoiseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoiseVerdict {
    pub reason: Option<NoiseReason>,
}

impl NoiseVerdict {
    pub fn is_noise(&self) -> bool {
        self.reason.is_some()
    }

    /// Reason label, empty when the URL is not noise
    pub fn reason_str(&self) -> &'static str {
        self.reason.map(|r| r.as_str()).unwrap_or("")
    }
}

/// How noise is treated during the crawl and in exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoisePolicy {
    /// Do not follow noise links; keep noise rows in exports with their reason
    #[default]
    Label,
    /// Do not follow noise links; drop noise rows from exports
    Exclude,
    /// Never consult the classifier
    Ignore,
}

impl NoisePolicy {
    /// Whether the crawl should refuse to enqueue noise URLs
    pub fn filters_crawl(&self) -> bool {
        !matches!(self, Self::Ignore)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Exclude => "exclude",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for NoisePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoisePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "label" => Ok(Self::Label),
            "exclude" => Ok(Self::Exclude),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "unknown noise policy '{}' (expected label, exclude or ignore)",
                other
            )),
        }
    }
}

/// Classifies a URL against the noise rules
///
/// Rules are checked in this order and the first match wins:
///
/// | # | Rule | Reason |
/// |---|------|--------|
/// | 1 | path starts with `/cart` or `/checkout` | Cart/Checkout |
/// | 2 | path starts with `/account` or `/orders` | Account |
/// | 3 | path starts with `/apps/`, `/admin` or `/tools/` | Admin/Apps |
/// | 4 | path starts with `/customer_authentication/` | Auth redirect |
/// | 5 | path starts with `/policies/` | Policies |
/// | 6 | path is exactly `/blogs/<name>` | Blog index |
/// | 7 | either robots string contains `noindex` | Noindex |
///
/// Path rules compare the lowercased path, so a cart page carrying
/// `noindex` is still reported as Cart/Checkout. Reordering the rules
/// changes results.
///
/// # Examples
///
/// ```
/// use site_auditor::noise::{classify, NoiseReason};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/cart/add").unwrap();
/// let verdict = classify(&url, "noindex", "");
/// assert_eq!(verdict.reason, Some(NoiseReason::CartCheckout));
/// ```
pub fn classify(url: &Url, meta_robots: &str, x_robots: &str) -> NoiseVerdict {
    NoiseVerdict {
        reason: classify_path(url.path()).or_else(|| robots_reason(meta_robots, x_robots)),
    }
}

/// Classifies a URL string; unparsable URLs are never noise
pub fn classify_str(url: &str, meta_robots: &str, x_robots: &str) -> NoiseVerdict {
    match Url::parse(url) {
        Ok(parsed) => classify(&parsed, meta_robots, x_robots),
        Err(_) => NoiseVerdict {
            reason: robots_reason(meta_robots, x_robots),
        },
    }
}

fn classify_path(path: &str) -> Option<NoiseReason> {
    let path = if path.is_empty() { "/" } else { path };
    let low = path.to_lowercase();

    if low.starts_with("/cart") || low.starts_with("/checkout") {
        return Some(NoiseReason::CartCheckout);
    }
    if low.starts_with("/account") || low.starts_with("/orders") {
        return Some(NoiseReason::Account);
    }
    if low.starts_with("/apps/") || low.starts_with("/admin") || low.starts_with("/tools/") {
        return Some(NoiseReason::AdminApps);
    }
    if low.starts_with("/customer_authentication/") {
        return Some(NoiseReason::AuthRedirect);
    }
    if low.starts_with("/policies/") {
        return Some(NoiseReason::Policies);
    }

    let segments: Vec<&str> = low.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() == 2 && segments[0] == "blogs" {
        return Some(NoiseReason::BlogIndex);
    }

    None
}

fn robots_reason(meta_robots: &str, x_robots: &str) -> Option<NoiseReason> {
    let noindex = |value: &str| value.to_lowercase().contains("noindex");
    if noindex(meta_robots) || noindex(x_robots) {
        Some(NoiseReason::Noindex)
    } else {
        None
    }
}
