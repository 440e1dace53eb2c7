//! Link graph derived from crawl edges
//!
//! Counts are plain edge counts: duplicate (source, target) pairs each count,
//! and a page linking to itself adds one inlink and one outlink to itself.

use crate::state::{Edge, PageRecord};
use std::collections::HashMap;

/// Inlink and outlink counts keyed by URL
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    inlinks: HashMap<String, usize>,
    outlinks: HashMap<String, usize>,
    edge_count: usize,
}

impl LinkGraph {
    /// Counts outlinks per source and inlinks per target
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = Self {
            edge_count: edges.len(),
            ..Self::default()
        };

        for edge in edges {
            *graph.outlinks.entry(edge.source.clone()).or_insert(0) += 1;
            *graph.inlinks.entry(edge.target.clone()).or_insert(0) += 1;
        }

        graph
    }

    /// Number of edges pointing at `url`
    pub fn inlinks_of(&self, url: &str) -> usize {
        self.inlinks.get(url).copied().unwrap_or(0)
    }

    /// Number of edges leaving `url`
    pub fn outlinks_of(&self, url: &str) -> usize {
        self.outlinks.get(url).copied().unwrap_or(0)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Backfills `inlinks` and `outlinks` on every page, keyed by final URL
    pub fn apply(&self, pages: &mut [PageRecord]) {
        for page in pages.iter_mut() {
            page.inlinks = self.inlinks_of(&page.final_url);
            page.outlinks = self.outlinks_of(&page.final_url);
        }
    }

    /// Pages nothing links to, other than the start page
    pub fn orphans<'a, I>(&self, pages: I, start_url: &str) -> Vec<&'a PageRecord>
    where
        I: IntoIterator<Item = &'a PageRecord>,
    {
        pages
            .into_iter()
            .filter(|page| page.final_url != start_url && page.url != start_url)
            .filter(|page| self.inlinks_of(&page.final_url) == 0)
            .collect()
    }
}
