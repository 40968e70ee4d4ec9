// src/domain.rs
// =============================================================================
// Registrable-domain helpers.
//
// "Same site" in this tool means "same registrable domain": www.example.com,
// shop.example.com and example.com are all the same site, but example.co.uk
// and other.co.uk are not, even though they share the "co.uk" ending. Getting
// that right needs the Public Suffix List, which the `psl` crate embeds.
// =============================================================================

use url::{Host, Url};

// A URL together with the registrable domain of its host
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    url: Url,
    registrable_domain: Option<String>,
}

impl CrawlTarget {
    pub fn new(url: Url) -> Self {
        let registrable_domain = registrable_domain(&url);
        Self {
            url,
            registrable_domain,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn registrable_domain(&self) -> Option<&str> {
        self.registrable_domain.as_deref()
    }

    // True when both sides have a registrable domain and they are equal
    //
    // Two hosts without one (e.g. "localhost") are never the same site.
    pub fn same_site(&self, other: &CrawlTarget) -> bool {
        match (self.registrable_domain(), other.registrable_domain()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

// Returns the registrable domain ("eTLD+1") of a URL's host
//
// Examples:
//   https://www.example.com/x  -> Some("example.com")
//   https://a.b.example.co.uk  -> Some("example.co.uk")
//   https://127.0.0.1/         -> Some("127.0.0.1")  (IPs stand for themselves)
//   file:///tmp/x              -> None
pub fn registrable_domain(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(host) => {
            let host = host.trim_end_matches('.');
            psl::domain_str(host).map(|d| d.to_ascii_lowercase())
        }
        Host::Ipv4(ip) => Some(ip.to_string()),
        Host::Ipv6(ip) => Some(ip.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_of(input: &str) -> Option<String> {
        registrable_domain(&Url::parse(input).unwrap())
    }

    #[test]
    fn test_strips_subdomains() {
        assert_eq!(domain_of("https://www.example.com/page"), Some("example.com".to_string()));
        assert_eq!(domain_of("https://ads.tracker.example.com/t.js"), Some("example.com".to_string()));
    }

    #[test]
    fn test_multi_label_suffix() {
        assert_eq!(domain_of("https://shop.example.co.uk/"), Some("example.co.uk".to_string()));
    }

    #[test]
    fn test_ip_host() {
        assert_eq!(domain_of("http://127.0.0.1:8080/"), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_no_host() {
        assert_eq!(domain_of("mailto:someone@example.com"), None);
    }

    fn target(input: &str) -> CrawlTarget {
        CrawlTarget::new(Url::parse(input).unwrap())
    }

    #[test]
    fn test_same_site() {
        let seed = target("https://a.example/");
        let about = target("https://www.a.example/about");
        let evil = target("https://evil.example/");
        assert!(seed.same_site(&about));
        assert!(!seed.same_site(&evil));
    }
}
