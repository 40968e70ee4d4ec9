// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - A hard page budget
// - Same-site restriction by registrable domain (can be turned off)
// - robots.txt checks before every page fetch
//
// Submodules:
// - frontier: the queue of pending URLs plus the visited-set
// - robots: the politeness gate
// - queue: the crawl loop that ties fetching and classifying together
// =============================================================================

mod frontier;
mod queue;
mod robots;

// Re-export the crawler
pub use queue::Crawler;
