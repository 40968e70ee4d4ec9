// src/checker/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - A `Transport` trait: "GET this URL and give me status, headers, body"
// - `ReqwestTransport`: the real implementation (connection pooling, redirects,
//   per-request timeout, our User-Agent on every request)
// - `Fetcher`: wraps a transport with retries, backoff and latency timing
//
// Retry rules:
// - Only transport failures (timeout, DNS, connection refused...) are retried
// - An HTTP error status (404, 500...) is a *successful* fetch: the server
//   answered, and we still want its headers and body
// - After attempt N fails we wait (N + 1) seconds before trying again; the
//   last attempt is never followed by a wait
//
// Rust concepts:
// - Traits + async-trait: so tests can plug in a fake website
// - Arc<dyn Trait>: shared ownership of a trait object
// - thiserror: typed errors without boilerplate
// =============================================================================

use crate::config::{FetchPolicy, ScanConfig};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, SET_COOKIE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

// A response as seen by the transport layer
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// URL after following redirects
    pub final_url: String,
    /// Raw Set-Cookie header values, one per header line
    pub set_cookies: Vec<String>,
    /// Content-Type header, if present
    pub content_type: Option<String>,
    /// Response body decoded as text
    pub body: String,
}

// Why a single request failed before the server gave us a status code
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed")]
    Connect,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("SSL certificate error")]
    Ssl,
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    // Categorizes the different ways reqwest can fail
    fn from(error: reqwest::Error) -> Self {
        let error_string = error.to_string().to_lowercase();

        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_redirect() {
            TransportError::TooManyRedirects
        } else if error.is_connect() {
            // Connection errors often mean DNS issues or host unreachable
            if error_string.contains("dns") {
                TransportError::Dns
            } else {
                TransportError::Connect
            }
        } else if error_string.contains("certificate") || error_string.contains("ssl") {
            TransportError::Ssl
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

// Anything that can perform a GET request
//
// Implementations must follow redirects and report the final URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Response, TransportError>;
}

// The real HTTP transport, backed by a pooled reqwest::Client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    // Builds a client with our User-Agent, timeout and redirect limit
    //
    // The client is created once per scan and reused for every request,
    // including robots.txt and privacy-policy re-fetches.
    pub fn new(config: &ScanConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.fetch.max_redirects))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .collect();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Reading the body can still time out or drop mid-way,
        // which counts as a transport failure like any other
        let body = response.text().await?;

        Ok(Response {
            status,
            final_url,
            set_cookies,
            content_type,
            body,
        })
    }
}

// The result of a successful fetch (any HTTP status counts as success)
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub final_url: String,
    pub set_cookies: Vec<String>,
    pub content_type: Option<String>,
    pub body: String,
    /// Time taken by the successful attempt, in milliseconds
    pub elapsed_ms: u64,
}

impl FetchResult {
    // True if the server labelled the response as HTML, whatever the body
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false)
    }

    // Returns the body only if the server said it's HTML and it isn't empty
    pub fn html(&self) -> Option<&str> {
        if self.is_html() && !self.body.is_empty() {
            Some(&self.body)
        } else {
            None
        }
    }
}

// Every attempt failed at the transport level
#[derive(Debug, Clone, Error)]
#[error("gave up on {url} after {attempts} attempt(s): {last}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    pub last: TransportError,
}

// Fetches URLs with bounded retries and backoff
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: FetchPolicy) -> Self {
        Self { transport, policy }
    }

    // Single request with no retry (used for robots.txt)
    pub async fn fetch_once(&self, url: &str) -> Result<Response, TransportError> {
        self.transport.get(url).await
    }

    // GET with up to `policy.attempts` tries
    //
    // Returns Ok for any HTTP status. Returns Err only when every attempt
    // failed before a response arrived.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let attempts = self.policy.attempts.max(1);
        let mut last = TransportError::Other("no attempt made".to_string());

        for attempt in 0..attempts {
            let started = Instant::now();

            match self.transport.get(url).await {
                Ok(response) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    return Ok(FetchResult {
                        status: response.status,
                        final_url: response.final_url,
                        set_cookies: response.set_cookies,
                        content_type: response.content_type,
                        body: response.body,
                        elapsed_ms,
                    });
                }
                Err(e) => {
                    log::debug!("Attempt {}/{} for {} failed: {}", attempt + 1, attempts, url, e);
                    last = e;

                    // No point sleeping if there's no retry coming
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.policy.backoff(attempt)).await;
                    }
                }
            }
        }

        Err(FetchError {
            url: url.to_string(),
            attempts,
            last,
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why put the HTTP client behind a trait?
//    - The crawl logic only needs "GET a URL, get a response"
//    - In production that's reqwest; in tests it's a HashMap of fake pages
//    - Tests then run offline, instantly, and can simulate timeouts on demand
//
// 2. What is async-trait?
//    - Rust traits can't (ergonomically) have async methods that work as
//      trait objects (dyn Transport)
//    - #[async_trait] rewrites them to return boxed futures so they can
//
// 3. Why Arc<dyn Transport>?
//    - Arc = Atomically Reference Counted pointer
//    - Lets the fetcher and the robots checker share one transport
//    - dyn Transport = "some type that implements Transport", chosen at runtime
//
// 4. Why is a 404 not an error here?
//    - The server answered! We still get headers (cookies) and maybe a body
//    - Only "no answer at all" is worth retrying
// -----------------------------------------------------------------------------
