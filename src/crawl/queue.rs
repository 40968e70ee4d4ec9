// src/crawl/queue.rs
// =============================================================================
// This module runs the crawl: a breadth-first walk over a website that
// produces one PageRecord per visited URL.
//
// How it works, per page:
// 1. Stop if the page budget is used up; otherwise pop the next URL from the
//    frontier (which marks it visited)
// 2. Ask the politeness gate (robots.txt); if disallowed, emit a
//    "robots_disallow" record and move on
// 3. Fetch the page (with retries); if every attempt fails, emit a
//    "fetch_failed" record and move on
// 4. If it's HTML: find the privacy policy link (and re-fetch it to check it
//    works), extract scripts, match trackers, queue outbound links
// 5. Emit the record
//
// Same-site filtering always compares against the SEED's registrable domain,
// not the current page's, so a redirect to another site doesn't drag the
// crawl along with it.
//
// Rust concepts:
// - Owned state: the crawler exclusively owns its frontier and robots cache
// - Streams: `into_stream` turns the crawl into an async iterator of records
// =============================================================================

use super::frontier::Frontier;
use super::robots::RobotsGate;
use crate::checker::{
    crawlable_links, detect_trackers, find_privacy_link, parse_page, FetchResult, Fetcher, RuleSet, Transport,
};
use crate::config::ScanConfig;
use crate::domain::CrawlTarget;
use crate::error::ScanError;
use crate::report::{Note, PageRecord, ScriptSrc};
use futures::stream::{self, Stream};
use std::sync::Arc;
use url::Url;

pub struct Crawler {
    config: ScanConfig,
    rules: RuleSet,
    seed: CrawlTarget,
    fetcher: Fetcher,
    robots: RobotsGate,
    frontier: Frontier,
}

impl Crawler {
    // Sets up a crawl from a seed URL
    //
    // Fails only if the seed can't be parsed into a scheme and host. Nothing
    // is fetched here.
    pub fn new(
        seed_url: &str,
        config: ScanConfig,
        rules: RuleSet,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ScanError> {
        let url = Url::parse(seed_url).map_err(|e| ScanError::invalid_seed(seed_url, e))?;
        if url.host_str().is_none() {
            return Err(ScanError::invalid_seed(seed_url, "URL has no host"));
        }

        // Seed the frontier with the normalized form so that links back to
        // the seed ("https://a.example" vs "https://a.example/") match it
        let mut url = url;
        url.set_fragment(None);
        let frontier = Frontier::new(url.as_str());

        let seed = CrawlTarget::new(url);
        let fetcher = Fetcher::new(transport, config.fetch.clone());
        let robots = RobotsGate::new(fetcher.clone(), config.robots_token());

        Ok(Self {
            config,
            rules,
            seed,
            fetcher,
            robots,
            frontier,
        })
    }

    pub fn seed(&self) -> &CrawlTarget {
        &self.seed
    }

    // Visits the next page and returns its record
    //
    // Returns None once the frontier is empty or the page budget is spent.
    pub async fn next_page(&mut self) -> Option<PageRecord> {
        if self.frontier.visited_count() >= self.config.max_pages {
            return None;
        }
        let url = self.frontier.pop()?;

        log::info!(
            "Scanning [{}/{}]: {} ({} queued)",
            self.frontier.visited_count(),
            self.config.max_pages,
            url,
            self.frontier.pending()
        );

        Some(self.visit(&url).await)
    }

    // Turns the crawl into a stream of records, in visit order
    pub fn into_stream(self) -> impl Stream<Item = PageRecord> {
        stream::unfold(self, |mut crawler| async move {
            let record = crawler.next_page().await?;
            Some((record, crawler))
        })
    }

    async fn visit(&mut self, url: &str) -> PageRecord {
        // Frontier entries are serialized Urls, so this doesn't fail in practice
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Skipping unparseable URL {}: {}", url, e);
                return PageRecord::skipped(url, Note::FetchFailed);
            }
        };

        if !self.robots.allowed(&parsed).await {
            log::warn!("robots.txt disallows {}", url);
            return PageRecord::skipped(url, Note::RobotsDisallow);
        }

        let fetched = match self.fetcher.fetch(url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                log::warn!("{}", e);
                return PageRecord::skipped(url, Note::FetchFailed);
            }
        };

        self.classify(url, fetched).await
    }

    async fn classify(&mut self, url: &str, fetched: FetchResult) -> PageRecord {
        let mut record = PageRecord {
            scanned_url: url.to_string(),
            final_url: Some(fetched.final_url.clone()),
            status: Some(fetched.status),
            response_ms: Some(fetched.elapsed_ms),
            set_cookies: fetched.set_cookies.clone(),
            third_party_scripts: Vec::new(),
            tracker_hits: Vec::new(),
            privacy_policy_url: None,
            privacy_policy_status: None,
            notes: Vec::new(),
        };

        if !fetched.is_html() {
            log::debug!("{} is not an HTML page; nothing to extract", url);
            record.notes.push(Note::NonHtml);
            return record;
        }

        // An HTML page with an empty body has nothing in it, but isn't non-HTML
        let (html, base) = match (fetched.html(), Url::parse(&fetched.final_url)) {
            (Some(html), Ok(base)) => (html, base),
            _ => {
                log::debug!("Nothing to extract from {}", url);
                return record;
            }
        };

        let page = parse_page(html, &base);

        if let Some(policy_url) = find_privacy_link(&page.anchors, &self.config.privacy_keywords) {
            log::debug!("Privacy policy candidate for {}: {}", url, policy_url);
            record.privacy_policy_url = Some(policy_url.to_string());

            match self.fetcher.fetch(policy_url.as_str()).await {
                Ok(policy) => record.privacy_policy_status = Some(policy.status),
                Err(e) => {
                    log::warn!("{}", e);
                    record.notes.push(Note::PrivacyPolicyUnreachable);
                }
            }
        }

        record.third_party_scripts = page
            .scripts
            .iter()
            .filter_map(|script| script.src())
            .map(|src| ScriptSrc { src: src.to_string() })
            .collect();
        record.tracker_hits = detect_trackers(&page.scripts, &self.rules);

        let mut queued = 0;
        for link in crawlable_links(&page.anchors) {
            if self.config.same_domain_only && !self.seed.same_site(&CrawlTarget::new(link.clone())) {
                continue;
            }
            if self.frontier.push(link.as_str()) {
                queued += 1;
            }
        }
        log::debug!("Queued {} new link(s) from {}", queued, url);

        record
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why check the budget before popping?
//    - Every popped URL produces a record and counts as visited
//    - Checking first means we never pop a URL we aren't going to process
//
// 2. What is stream::unfold?
//    - It builds a Stream from a state value and an async "step" function
//    - Each step returns Some((item, next_state)) or None to finish
//    - Here the state is the Crawler itself, moved in and out of each step
//
// 3. Why is a robots/fetch failure not an Err?
//    - One bad page should never abort the whole scan
//    - The problem is recorded as a note on that page's record instead
//
// 4. Why the `?` inside `next_page`?
//    - `self.frontier.pop()?` returns None from next_page when the
//      frontier is empty - the ? operator works on Option too
// -----------------------------------------------------------------------------
