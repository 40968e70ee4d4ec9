// src/config.rs
// =============================================================================
// Scan configuration.
//
// Everything that used to be a hard-coded constant (the user agent, the
// privacy keyword list, timeouts, retry counts) lives here with a sensible
// Default. The CLI overlays its flags on top of the default, and tests can
// shrink things like the retry backoff so they run instantly.
// =============================================================================

use std::time::Duration;

/// Identifying agent string sent on every request
pub const USER_AGENT: &str = "PrivacyScanner/1.0 (+https://example.local)";

/// Words that suggest an anchor points at a privacy or cookie policy
pub const PRIVACY_KEYWORDS: &[&str] = &["privacy", "policy", "cookie", "cookies", "data", "pdpl", "gdpr"];

// How the fetcher behaves on each request
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Total attempts per URL (first try + retries)
    pub attempts: u32,
    /// Timeout for a single attempt
    pub timeout: Duration,
    /// Maximum redirects followed per attempt
    pub max_redirects: usize,
    /// Wait before retrying after failed attempt N is (N + 1) * backoff_unit
    pub backoff_unit: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(15),
            max_redirects: 10,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl FetchPolicy {
    // Delay to wait after attempt `attempt` (0-based) failed, before the
    // next one starts
    //
    // attempt 0 -> 1 unit, attempt 1 -> 2 units. The fetcher never waits
    // after its final attempt, so with 3 attempts a failing URL costs
    // 1 + 2 units of waiting, not 1 + 2 + 3.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit * (attempt + 1)
    }
}

// Settings for one crawl run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// User-Agent header, sent verbatim on every request
    pub user_agent: String,
    /// Keywords used to score privacy-policy links
    pub privacy_keywords: Vec<String>,
    /// Page budget: the crawl stops after this many pages are visited
    pub max_pages: usize,
    /// Only follow links whose registrable domain matches the seed's
    pub same_domain_only: bool,
    pub fetch: FetchPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            privacy_keywords: PRIVACY_KEYWORDS.iter().map(|w| w.to_string()).collect(),
            max_pages: 40,
            same_domain_only: true,
            fetch: FetchPolicy::default(),
        }
    }
}

impl ScanConfig {
    // The product token robots.txt groups are matched against
    //
    // "PrivacyScanner/1.0 (+https://example.local)" -> "PrivacyScanner"
    pub fn robots_token(&self) -> &str {
        self.user_agent
            .split('/')
            .next()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .unwrap_or(self.user_agent.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_linearly() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(3));
    }

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.max_pages, 40);
        assert!(config.same_domain_only);
        assert_eq!(config.fetch.attempts, 3);
        assert_eq!(config.fetch.timeout, Duration::from_secs(15));
        assert_eq!(config.privacy_keywords.len(), 7);
    }

    #[test]
    fn test_robots_token() {
        let config = ScanConfig::default();
        assert_eq!(config.robots_token(), "PrivacyScanner");

        let bare = ScanConfig {
            user_agent: "JustAName".to_string(),
            ..ScanConfig::default()
        };
        assert_eq!(bare.robots_token(), "JustAName");
    }
}
