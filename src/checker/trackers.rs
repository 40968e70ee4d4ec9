// src/checker/trackers.rs
// =============================================================================
// Tracker detection.
//
// Rules come from a small YAML file:
//
//   third_party_domains:
//     - google-analytics.com
//     - connect.facebook.net
//   keywords:
//     - fbq
//     - gtag(
//
// - A domain rule matches an external script whose host *is* that domain or
//   is a subdomain of it ("ads.tracker.com" matches "tracker.com",
//   "nottracker.com" does not).
// - A keyword rule matches an inline script whose code contains it,
//   ignoring case.
//
// A missing or broken rule file is not fatal: the scan runs with no rules
// and simply reports no tracker hits.
// =============================================================================

use super::html::ScriptRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("could not read rule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse rule file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// The two rule lists, as they appear in the file
//
// Either list may be missing; it then defaults to empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RuleSet {
    #[serde(default)]
    pub third_party_domains: BTreeSet<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
}

impl RuleSet {
    // Parses rules from YAML text
    //
    // An empty document is valid and means "no rules".
    pub fn from_yaml(text: &str) -> Result<Self, RulesError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let rules: Option<RuleSet> = serde_yaml::from_str(text)?;
        Ok(rules.unwrap_or_default().normalized())
    }

    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    // Loads rules, falling back to an empty set on any problem
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(rules) if rules.is_empty() => {
                log::warn!("{} contains no rules; tracker detection disabled", path.display());
                rules
            }
            Ok(rules) => {
                log::info!(
                    "Loaded {} domain rule(s) and {} keyword rule(s) from {}",
                    rules.third_party_domains.len(),
                    rules.keywords.len(),
                    path.display()
                );
                rules
            }
            Err(e) => {
                log::warn!("{} ({}); tracker detection disabled", e, path.display());
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.third_party_domains.is_empty() && self.keywords.is_empty()
    }

    // Domains are trimmed, lower-cased and lose any leading dot.
    // Keywords are kept exactly as written; only blank ones are dropped.
    fn normalized(self) -> Self {
        let third_party_domains = self
            .third_party_domains
            .into_iter()
            .map(|rule| rule.trim().trim_start_matches('.').to_lowercase())
            .filter(|rule| !rule.is_empty())
            .collect();
        let keywords = self
            .keywords
            .into_iter()
            .filter(|keyword| !keyword.trim().is_empty())
            .collect();
        Self {
            third_party_domains,
            keywords,
        }
    }
}

// Where a tracker was spotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HitLocation {
    #[serde(rename = "script-src")]
    ScriptSrc,
    #[serde(rename = "inline-script")]
    InlineScript,
}

// One rule matching one script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerHit {
    /// The rule string that matched
    pub rule: String,
    /// Which kind of script it matched in
    #[serde(rename = "where")]
    pub location: HitLocation,
    /// The script URL (external scripts only)
    pub url: Option<String>,
}

// True if `host` is `rule` or a subdomain of it
fn host_matches(host: &str, rule: &str) -> bool {
    host == rule
        || host
            .strip_suffix(rule)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}

// Matches a page's scripts against the rules
//
// Every matching rule produces a hit, so one script can produce several.
// Hits come out in script order, then rule order.
pub fn detect_trackers(scripts: &[ScriptRef], rules: &RuleSet) -> Vec<TrackerHit> {
    let mut hits = Vec::new();

    for script in scripts {
        match script {
            ScriptRef::External { src } => {
                let host = match Url::parse(src).ok().and_then(|u| u.host_str().map(|h| h.to_lowercase())) {
                    Some(host) => host,
                    None => continue,
                };
                let host = host.trim_end_matches('.');

                for rule in &rules.third_party_domains {
                    if host_matches(host, rule) {
                        hits.push(TrackerHit {
                            rule: rule.clone(),
                            location: HitLocation::ScriptSrc,
                            url: Some(src.clone()),
                        });
                    }
                }
            }
            ScriptRef::Inline { code } => {
                let code = code.to_lowercase();
                for keyword in &rules.keywords {
                    if code.contains(&keyword.to_lowercase()) {
                        hits.push(TrackerHit {
                            rule: keyword.clone(),
                            location: HitLocation::InlineScript,
                            url: None,
                        });
                    }
                }
            }
        }
    }

    hits
}
