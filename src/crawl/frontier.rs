// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: URLs we know about but haven't visited yet.
//
// How it works:
// - A FIFO queue (VecDeque) gives breadth-first order: pages closer to the
//   seed are visited first
// - A visited-set (HashSet) is the single source of truth for "has this URL
//   been fetched?" - a URL is marked visited the moment it's popped, before
//   any network activity, so it can never be fetched twice
// - A queued-set lets push() ignore URLs that are already waiting, which
//   keeps the queue small on sites where every page links to the same menu
//
// Rust concepts:
// - VecDeque: Double-ended queue for breadth-first crawling
// - HashSet: O(1) membership checks
// =============================================================================

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    // Creates a frontier holding just the seed URL
    pub fn new(seed: &str) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    // Adds a candidate URL
    //
    // Returns false (and does nothing) if it was already visited or queued.
    pub fn push(&mut self, url: &str) -> bool {
        if self.is_visited(url) || self.queued.contains(url) {
            return false;
        }
        self.queued.insert(url.to_string());
        self.queue.push_back(url.to_string());
        true
    }

    // Pops the next unvisited URL and marks it visited in the same step
    //
    // Returns None when the queue is exhausted.
    pub fn pop(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new("https://a.example/");
        frontier.push("https://a.example/1");
        frontier.push("https://a.example/2");

        assert_eq!(frontier.pop().as_deref(), Some("https://a.example/"));
        assert_eq!(frontier.pop().as_deref(), Some("https://a.example/1"));
        assert_eq!(frontier.pop().as_deref(), Some("https://a.example/2"));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_marks_visited_on_pop() {
        let mut frontier = Frontier::new("https://a.example/");
        assert!(!frontier.is_visited("https://a.example/"));

        frontier.pop();
        assert!(frontier.is_visited("https://a.example/"));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_visited_url_is_never_returned_again() {
        let mut frontier = Frontier::new("https://a.example/");
        frontier.pop();

        assert!(!frontier.push("https://a.example/"));
        assert_eq!(frontier.pop(), None);
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_queued_duplicates_are_ignored() {
        let mut frontier = Frontier::new("https://a.example/");
        assert!(frontier.push("https://a.example/about"));
        assert!(!frontier.push("https://a.example/about"));
        assert_eq!(frontier.pending(), 2);
    }
}
