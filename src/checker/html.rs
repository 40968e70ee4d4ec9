// src/checker/html.rs
// =============================================================================
// This module reads an HTML page and pulls out what the scanner cares about:
//
// - Anchors (<a href>): resolved to absolute URLs, with their visible text.
//   These feed both the privacy-policy heuristic and the crawl frontier.
// - Scripts (<script>): either external (has src=...) or inline (has code).
//   These feed the tracker matcher.
//
// It also holds the privacy-policy link heuristic, which is a simple scoring
// function over anchors:
//
//   +3 for each privacy keyword in the anchor text
//   +2 for each privacy keyword in the resolved URL
//   -0.2 for each '/' in the resolved URL (prefer short, direct links)
//
// The best-scoring anchor wins if it scores at least 3.
//
// We use the `scraper` crate for parsing (html5ever underneath) and the `url`
// crate to resolve relative links against the page's final URL.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Inline script bodies are cut to this many characters
pub const MAX_INLINE_SCRIPT_CHARS: usize = 4000;

/// Minimum score for an anchor to count as the privacy policy link
pub const PRIVACY_LINK_THRESHOLD: f64 = 3.0;

// An <a href> with its target resolved against the page URL
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub href: Url,
    pub text: String,
}

// A <script> element, in one of its two shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptRef {
    /// <script src="..."> with the src resolved to an absolute URL
    External { src: String },
    /// <script>...</script> with its code (truncated)
    Inline { code: String },
}

impl ScriptRef {
    pub fn src(&self) -> Option<&str> {
        match self {
            ScriptRef::External { src } => Some(src),
            ScriptRef::Inline { .. } => None,
        }
    }
}

// Everything we extract from one HTML document, in document order
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub anchors: Vec<Anchor>,
    pub scripts: Vec<ScriptRef>,
}

// Parses an HTML document
//
// Parameters:
//   html: the raw markup
//   base: the URL the page was served from (after redirects)
//
// The parsed DOM is dropped before returning; only owned data comes out.
pub fn parse_page(html: &str, base: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    // These selectors are constants and known to be valid
    let anchor_selector = Selector::parse("a[href]").expect("valid anchor selector");
    let script_selector = Selector::parse("script").expect("valid script selector");

    let anchors = document
        .select(&anchor_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let href = base.join(href).ok()?;
            Some(Anchor {
                href,
                text: visible_text(&element),
            })
        })
        .collect();

    let scripts = document
        .select(&script_selector)
        .filter_map(|element| match element.value().attr("src") {
            Some(src) => base
                .join(src)
                .ok()
                .map(|url| ScriptRef::External { src: url.to_string() }),
            None => {
                let code: String = element
                    .text()
                    .collect::<String>()
                    .chars()
                    .take(MAX_INLINE_SCRIPT_CHARS)
                    .collect();
                Some(ScriptRef::Inline { code })
            }
        })
        .collect();

    ParsedPage { anchors, scripts }
}

// Text nodes of an element, each trimmed, glued together
fn visible_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

// Scores one anchor for "how much does this look like a privacy policy link"
pub fn score_privacy_link(text: &str, href: &str, keywords: &[String]) -> f64 {
    let text = text.to_lowercase();
    let href = href.to_lowercase();

    let mut score = 0.0;
    for word in keywords {
        let word = word.to_lowercase();
        if text.contains(&word) {
            score += 3.0;
        }
        if href.contains(&word) {
            score += 2.0;
        }
    }

    let slashes = href.matches('/').count() as f64;
    score - slashes * 0.2
}

// Picks the privacy policy URL out of a page's anchors
//
// Keeps a running maximum that only moves on a strictly better score, so on
// ties the first anchor in document order wins. Returns None if nothing
// reaches the threshold.
pub fn find_privacy_link(anchors: &[Anchor], keywords: &[String]) -> Option<Url> {
    let (best_score, best) = anchors.iter().fold((0.0, None), |(best_score, best), anchor| {
        let score = score_privacy_link(&anchor.text, anchor.href.as_str(), keywords);
        if score > best_score {
            (score, Some(&anchor.href))
        } else {
            (best_score, best)
        }
    });

    if best_score >= PRIVACY_LINK_THRESHOLD {
        best.cloned()
    } else {
        None
    }
}

// Anchor targets that could be crawled next, in document order
//
// Drops anything that isn't http(s) (mailto:, javascript:, ...) and strips
// #fragments so "/page#top" and "/page" are the same crawl target.
pub fn crawlable_links(anchors: &[Anchor]) -> Vec<Url> {
    anchors
        .iter()
        .filter(|anchor| matches!(anchor.href.scheme(), "http" | "https"))
        .map(|anchor| {
            let mut url = anchor.href.clone();
            url.set_fragment(None);
            url
        })
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the score an f64?
//    - The depth penalty is fractional (0.2 per slash)
//    - Comparing floats with > is fine here; we never test for equality
//
// 2. What does fold do?
//    - It walks an iterator carrying an "accumulator" value along
//    - Here the accumulator is (best score so far, best anchor so far)
//    - It's the functional version of "keep best, update when better"
//
// 3. Why resolve against the *final* URL?
//    - If /old redirects to /new/, a relative link "page" on that page
//      means /new/page, not /page
//
// 4. Why does parse_page return owned data?
//    - scraper's Html type isn't Send, so it can't be held across an .await
//    - Extracting Strings/Urls up front keeps the async crawl loop simple
// -----------------------------------------------------------------------------
