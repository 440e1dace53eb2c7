//! URL handling module for the auditor
//!
//! This module provides href resolution, parameter stripping, host and site
//! extraction, filename derivation and host scoping. Everything here is a pure
//! string/URL transform: no network access, no panics on malformed input.

mod domain;
mod matcher;
mod normalize;
mod params;

use ::url::Url;

// Re-export main functions
pub use domain::{host_of, path_slug, site_of};
pub use matcher::same_site;
pub use normalize::{dedup_key, resolve_url, strip_params};
pub use params::{param_risk, ParamRisk};

/// Host scoping rule for a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScope {
    start_host: String,
    same_host: bool,
}

impl HostScope {
    /// Creates a scope anchored at the start URL
    ///
    /// With `same_host` the candidate host (port included) must equal the
    /// start host exactly. Without it, any host of the same site is admitted
    /// (see [`same_site`]).
    pub fn new(start_url: &Url, same_host: bool) -> Self {
        Self {
            start_host: host_of(start_url),
            same_host,
        }
    }

    /// The host every in-scope URL is compared against
    pub fn start_host(&self) -> &str {
        &self.start_host
    }

    /// Returns true if the URL may be recorded and crawled
    pub fn contains(&self, url: &Url) -> bool {
        let candidate = host_of(url);
        if self.same_host {
            candidate == self.start_host
        } else {
            same_site(&self.start_host, &candidate)
        }
    }
}
