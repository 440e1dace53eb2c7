//! In-memory results of a single audit run

use crate::state::{Edge, PageRecord};
use std::collections::{BTreeMap, HashMap};

/// Pages, edges and hreflang alternates gathered by one crawl
///
/// Pages keep crawl order. There is exactly one record per final URL: a
/// later record for the same final URL replaces the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct CrawlSession {
    start_url: String,
    host: String,
    pages: Vec<PageRecord>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    hreflang: BTreeMap<String, Vec<(String, String)>>,
}

impl CrawlSession {
    /// Creates an empty session for a crawl rooted at `start_url`
    pub fn new(start_url: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Stores a record keyed by its final URL
    ///
    /// Returns true if the final URL was new.
    pub fn insert_page(&mut self, record: PageRecord) -> bool {
        match self.index.get(&record.final_url) {
            Some(&position) => {
                self.pages[position] = record;
                false
            }
            None => {
                self.index.insert(record.final_url.clone(), self.pages.len());
                self.pages.push(record);
                true
            }
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [PageRecord] {
        &mut self.pages
    }

    /// Looks up a record by final URL
    pub fn page(&self, final_url: &str) -> Option<&PageRecord> {
        self.index.get(final_url).map(|&position| &self.pages[position])
    }

    pub fn page_mut(&mut self, final_url: &str) -> Option<&mut PageRecord> {
        match self.index.get(final_url) {
            Some(&position) => Some(&mut self.pages[position]),
            None => None,
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Replaces the hreflang alternates of a page
    pub fn set_hreflang(&mut self, final_url: &str, pairs: Vec<(String, String)>) {
        if pairs.is_empty() {
            self.hreflang.remove(final_url);
        } else {
            self.hreflang.insert(final_url.to_string(), pairs);
        }
    }

    /// Alternates declared by each page, as (lang, absolute href) pairs
    pub fn hreflang(&self) -> &BTreeMap<String, Vec<(String, String)>> {
        &self.hreflang
    }

    /// Splits the session into mutable pages and shared edges
    pub(crate) fn pages_and_edges(&mut self) -> (&mut [PageRecord], &[Edge]) {
        (&mut self.pages, &self.edges)
    }
}
