// src/checker/mod.rs
// =============================================================================
// This module contains the per-page logic: fetching and classifying.
//
// Submodules:
// - http: fetches pages (with retries) behind a swappable transport
// - html: extracts anchors and scripts, finds the privacy policy link
// - trackers: matches scripts against tracker rules
//
// This file (mod.rs) is the module root - it re-exports the public API so
// the rest of the program can write `checker::Fetcher` instead of
// `checker::http::Fetcher`.
// =============================================================================

mod html;
mod http;
mod trackers;

pub use html::{crawlable_links, find_privacy_link, parse_page};
pub use http::{FetchResult, Fetcher, ReqwestTransport, Transport};
pub use trackers::{detect_trackers, RuleSet, TrackerHit};

#[cfg(test)]
pub(crate) use html::ScriptRef;
#[cfg(test)]
pub(crate) use http::tests::{http_response, instant_policy, serve, FakeTransport};
#[cfg(test)]
pub(crate) use http::{Response, TransportError};
