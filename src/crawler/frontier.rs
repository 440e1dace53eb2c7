//! Breadth-first crawl frontier
//!
//! A FIFO queue of (URL, depth) pairs plus the set of dedup keys ever
//! enqueued. A key is admitted once per run, so no URL is fetched twice.

use crate::url::dedup_key;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    pub url: Url,
    /// Link distance from the start URL
    pub depth: u32,
}

/// FIFO frontier with dedup on enqueue
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    seen: HashSet<String>,
    include_params: bool,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL at depth 0
    pub fn new(start: Url, include_params: bool) -> Self {
        let mut frontier = Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            include_params,
        };
        frontier.push(start, 0);
        frontier
    }

    /// Enqueues a URL unless its dedup key was already seen
    ///
    /// Returns true if the URL was enqueued.
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        let key = dedup_key(&url, self.include_params);
        if !self.seen.insert(key) {
            return false;
        }
        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    pub fn pop(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
