// src/report.rs
// =============================================================================
// The per-page output record.
//
// Every URL the crawler pops off the frontier produces exactly one PageRecord,
// even if the page was never fetched (robots.txt said no, or the server never
// answered). Those "skipped" records carry only the requested URL and a note;
// every other field is null or empty so all lines share one shape.
//
// Records are printed as one JSON object per line:
//
//   {"scanned_url":"https://a.example/","final_url":"https://a.example/",
//    "status":200,"response_ms":87,"set_cookies":[],"third_party_scripts":[],
//    "tracker_hits":[],"privacy_policy_url":null,"privacy_policy_status":null,
//    "notes":[]}
// =============================================================================

use crate::checker::TrackerHit;
use serde::Serialize;

// Free-form flags attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Note {
    /// robots.txt disallows this URL; it was not fetched
    RobotsDisallow,
    /// every fetch attempt failed at the transport level
    FetchFailed,
    /// the response was not an HTML document, so nothing was extracted
    NonHtml,
    /// a privacy policy link was found but fetching it failed
    PrivacyPolicyUnreachable,
}

// An external script reference as it appears in the output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptSrc {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    /// The URL taken from the frontier
    pub scanned_url: String,
    /// Where we ended up after redirects
    pub final_url: Option<String>,
    pub status: Option<u16>,
    /// Latency of the successful fetch attempt
    pub response_ms: Option<u64>,
    /// Raw Set-Cookie header values
    pub set_cookies: Vec<String>,
    pub third_party_scripts: Vec<ScriptSrc>,
    pub tracker_hits: Vec<TrackerHit>,
    pub privacy_policy_url: Option<String>,
    pub privacy_policy_status: Option<u16>,
    pub notes: Vec<Note>,
}

impl PageRecord {
    // A record for a page we never fetched
    pub fn skipped(scanned_url: &str, note: Note) -> Self {
        Self {
            scanned_url: scanned_url.to_string(),
            final_url: None,
            status: None,
            response_ms: None,
            set_cookies: Vec::new(),
            third_party_scripts: Vec::new(),
            tracker_hits: Vec::new(),
            privacy_policy_url: None,
            privacy_policy_status: None,
            notes: vec![note],
        }
    }

    pub fn has_note(&self, note: Note) -> bool {
        self.notes.contains(&note)
    }

    // Serializes to a single line of JSON
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
