// src/crawl/robots.rs
// =============================================================================
// The politeness gate: checks robots.txt before we fetch a page.
//
// Rules:
// - robots.txt lives at scheme://host[:port]/robots.txt
// - It's fetched once per host per scan (a single attempt, no retries) and
//   the verdict is cached for the rest of the run
// - If it can't be fetched or parsed, we ALLOW (fail-open): a broken or
//   missing robots file must never stall the scan
// - 401/403 on robots.txt itself means the site refuses crawlers outright,
//   so everything on that host is disallowed
//
// Parsing is done by the `texting_robots` crate.
// =============================================================================

use crate::checker::Fetcher;
use std::collections::HashMap;
use texting_robots::Robot;
use url::Url;

// What we know about one host's robots.txt
enum RobotsPolicy {
    AllowAll,
    DisallowAll,
    Rules(Robot),
}

impl RobotsPolicy {
    fn allows(&self, url: &Url) -> bool {
        match self {
            RobotsPolicy::AllowAll => true,
            RobotsPolicy::DisallowAll => false,
            RobotsPolicy::Rules(robot) => robot.allowed(url.as_str()),
        }
    }
}

pub struct RobotsGate {
    fetcher: Fetcher,
    agent: String,
    cache: HashMap<String, RobotsPolicy>,
}

impl RobotsGate {
    // `agent` is the product token matched against User-agent lines
    pub fn new(fetcher: Fetcher, agent: &str) -> Self {
        Self {
            fetcher,
            agent: agent.to_string(),
            cache: HashMap::new(),
        }
    }

    // Returns true if we may fetch `url`
    pub async fn allowed(&mut self, url: &Url) -> bool {
        let Some(robots_url) = robots_url(url) else {
            return true;
        };

        if !self.cache.contains_key(&robots_url) {
            let policy = self.load(&robots_url).await;
            self.cache.insert(robots_url.clone(), policy);
        }

        self.cache
            .get(&robots_url)
            .map(|policy| policy.allows(url))
            .unwrap_or(true)
    }

    async fn load(&self, robots_url: &str) -> RobotsPolicy {
        let response = match self.fetcher.fetch_once(robots_url).await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Could not fetch {}: {}; allowing", robots_url, e);
                return RobotsPolicy::AllowAll;
            }
        };

        match response.status {
            200..=299 => match Robot::new(&self.agent, response.body.as_bytes()) {
                Ok(robot) => RobotsPolicy::Rules(robot),
                Err(e) => {
                    log::debug!("Could not parse {}: {}; allowing", robots_url, e);
                    RobotsPolicy::AllowAll
                }
            },
            401 | 403 => {
                log::warn!("{} answered HTTP {}; treating the host as disallowed", robots_url, response.status);
                RobotsPolicy::DisallowAll
            }
            status => {
                log::debug!("{} answered HTTP {}; allowing", robots_url, status);
                RobotsPolicy::AllowAll
            }
        }
    }
}

// Builds the robots.txt URL for a page
//
// Example: https://a.example:8443/x/y?z -> https://a.example:8443/robots.txt
fn robots_url(url: &Url) -> Option<String> {
    url.host_str()?;
    Some(format!("{}/robots.txt", url.origin().ascii_serialization()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{instant_policy, FakeTransport, TransportError};
    use std::sync::Arc;

    fn gate(transport: &Arc<FakeTransport>) -> RobotsGate {
        RobotsGate::new(Fetcher::new(transport.clone(), instant_policy()), "PrivacyScanner")
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_robots_url() {
        assert_eq!(
            robots_url(&url("https://a.example:8443/x/y?z=1")).as_deref(),
            Some("https://a.example:8443/robots.txt")
        );
        assert_eq!(robots_url(&url("http://a.example/")).as_deref(), Some("http://a.example/robots.txt"));
    }

    #[tokio::test]
    async fn test_disallowed_path() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "https://a.example/robots.txt",
            200,
            "text/plain",
            "User-agent: *\nDisallow: /private\n",
        );

        let mut gate = gate(&transport);
        assert!(!gate.allowed(&url("https://a.example/private/page")).await);
        assert!(gate.allowed(&url("https://a.example/public")).await);
    }

    #[tokio::test]
    async fn test_agent_specific_group() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "https://a.example/robots.txt",
            200,
            "text/plain",
            "User-agent: PrivacyScanner\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
        );

        let mut gate = gate(&transport);
        assert!(!gate.allowed(&url("https://a.example/")).await);
    }

    #[tokio::test]
    async fn test_unreachable_robots_allows() {
        let transport = Arc::new(FakeTransport::new());
        transport.fail("https://a.example/robots.txt", TransportError::Timeout);

        let mut gate = gate(&transport);
        assert!(gate.allowed(&url("https://a.example/anything")).await);
        // single attempt, no retries
        assert_eq!(transport.count("https://a.example/robots.txt"), 1);
    }

    #[tokio::test]
    async fn test_missing_robots_allows() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("https://a.example/robots.txt", 404, "text/html", "not found");

        let mut gate = gate(&transport);
        assert!(gate.allowed(&url("https://a.example/")).await);
    }

    #[tokio::test]
    async fn test_forbidden_robots_disallows() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("https://a.example/robots.txt", 403, "text/html", "forbidden");

        let mut gate = gate(&transport);
        assert!(!gate.allowed(&url("https://a.example/")).await);
    }

    #[tokio::test]
    async fn test_verdict_is_cached_per_host() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("https://a.example/robots.txt", 200, "text/plain", "User-agent: *\nAllow: /\n");

        let mut gate = gate(&transport);
        gate.allowed(&url("https://a.example/1")).await;
        gate.allowed(&url("https://a.example/2")).await;
        gate.allowed(&url("https://www.a.example/")).await;

        assert_eq!(transport.count("https://a.example/robots.txt"), 1);
        assert_eq!(transport.count("https://www.a.example/robots.txt"), 1);
    }
}
