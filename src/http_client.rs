//! Browser-like HTTP client
//!
//! One `reqwest` client shared by the resolver and the fetcher:
//! - Browser fingerprint headers (document vs. media flavour per request)
//! - Fixed overall timeout, no retries
//! - Cookie jar so session cookies set by the page survive redirects
//! - Redirects followed for pages and media probes alike

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, instrument};

use crate::error::{GrabError, Result};
use crate::fingerprint::{chrome_profile, BrowserProfile};

/// Default timeout for page fetches, probes and downloads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a header-only media request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub status: StatusCode,
    /// Parsed `Content-Length` header, if the upstream reported one.
    pub content_length: Option<u64>,
}

/// HTTP client that presents itself as a desktop browser.
#[derive(Debug, Clone)]
pub struct BrowserClient {
    client: Client,
    profile: BrowserProfile,
    page_headers: HeaderMap,
    media_headers: HeaderMap,
}

impl BrowserClient {
    /// Create a client with a random Chrome profile and the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_profile(chrome_profile(), DEFAULT_TIMEOUT)
    }

    /// Create a client with a specific browser profile and timeout.
    pub fn with_profile(profile: BrowserProfile, timeout: Duration) -> Result<Self> {
        let page_headers = profile
            .page_headers()
            .map_err(|e| GrabError::Internal(format!("invalid page header: {e}")))?;
        let media_headers = profile
            .media_headers()
            .map_err(|e| GrabError::Internal(format!("invalid media header: {e}")))?;

        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()
            .map_err(|e| GrabError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            profile,
            page_headers,
            media_headers,
        })
    }

    /// Fetch an HTML page and return its body.
    ///
    /// Any non-2xx status is a [`GrabError::PageStatus`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching page");
        let response = self
            .client
            .get(url)
            .headers(self.page_headers.clone())
            .send()
            .await?;

        let status = response.status();
        info!(status = %status, version = ?response.version(), "Page response received");
        if !status.is_success() {
            return Err(GrabError::PageStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Issue a `HEAD` request with media headers.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn probe(&self, url: &str) -> Result<Probe> {
        let response = self
            .client
            .head(url)
            .headers(self.media_headers.clone())
            .send()
            .await?;

        // Response::content_length reflects the (empty) HEAD body, not the header
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let probe = Probe {
            status: response.status(),
            content_length,
        };
        debug!(status = %probe.status, content_length = ?probe.content_length, "Probe response");
        Ok(probe)
    }

    /// Start a streamed `GET` with media headers. The body is left unread.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_media(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .headers(self.media_headers.clone())
            .send()
            .await?;
        debug!(status = %response.status(), "Media response headers received");
        Ok(response)
    }

    /// Browser profile this client presents.
    #[must_use]
    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }
}
