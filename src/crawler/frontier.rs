//! Frontier and visited set for the breadth-first crawl
//!
//! This module handles:
//! - The FIFO queue of URLs discovered but not yet fetched
//! - The set of URLs already fetched (attempted) in this run
//! - Making sure no URL is queued twice
//!
//! Both sets only live for one run; there is no persistence or resume.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Pending and visited URLs of a crawl run
///
/// Invariants:
/// - a URL is in `pending` exactly when it is in `queue`
/// - a URL is never pushed while it is pending or visited
/// - `visited` only grows
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, oldest first
    queue: VecDeque<Url>,

    /// Keys of the URLs currently in `queue`
    pending: HashSet<String>,

    /// Keys of the URLs already fetched
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Appends a URL unless it is already pending or visited
    ///
    /// # Returns
    ///
    /// * `true` - The URL was queued
    /// * `false` - The URL was already known
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.pending.contains(key) {
            return false;
        }

        self.pending.insert(key.to_string());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the oldest pending URL
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.pending.remove(url.as_str());
        Some(url)
    }

    /// Records that a URL is about to be fetched
    ///
    /// Returns false if it had already been visited, in which case it must not
    /// be fetched again.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// Returns true if the URL has been fetched in this run
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if the URL is waiting in the queue
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    /// Pending URLs in the order they will be fetched
    pub fn pending_urls(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter()
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no URL is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs fetched so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
