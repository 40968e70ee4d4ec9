// src/error.rs
// =============================================================================
// Error types for the scanner.
//
// Almost nothing in a crawl is fatal: a page that can't be fetched or a
// robots.txt that can't be read just becomes a note in that page's record.
// The only thing that stops a scan before it starts is a seed URL we can't
// make sense of, or an HTTP client we can't build.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display/Error impls for us
// - #[from]: automatic conversion so the ? operator works
// =============================================================================

use thiserror::Error;

/// Errors that abort a scan before any page is visited
#[derive(Debug, Error)]
pub enum ScanError {
    /// The seed URL could not be parsed into a scheme and host
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ScanError {
    pub fn invalid_seed(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSeed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
