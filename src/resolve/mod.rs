//! Page URL → direct media URL.
//!
//! # Architecture
//!
//! - [`MediaExtractor`]: pure `html -> url | NotFound`, no I/O
//! - [`ScriptPatternExtractor`]: default extractor, ordered regexes over
//!   inline `<script>` blocks
//! - [`DebugSink`]: optional destination for the fetched markup
//! - [`Resolver`]: validates the page URL, fetches it, runs the extractor
//!
//! # Example
//!
//! ```rust,no_run
//! use vidgrab::resolve::Resolver;
//! use vidgrab::BrowserClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = Resolver::new(BrowserClient::new()?)?;
//! let url = resolver.resolve("https://www.facebook.com/watch/?v=123").await?;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

pub mod debug;
pub mod patterns;

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{GrabError, Result};
use crate::http_client::BrowserClient;

pub use debug::{DebugSink, DirectorySink};
pub use patterns::{script_blocks, MediaPattern, PatternSpec, ScriptPatternExtractor};

/// Finds a direct media URL in page markup.
pub trait MediaExtractor: Send + Sync {
    /// Extractor name for logs.
    fn name(&self) -> &'static str;

    /// Return the media URL, or [`GrabError::NotFound`].
    fn extract(&self, html: &str) -> Result<String>;
}

/// Resolves social media page URLs to direct media URLs.
#[derive(Clone)]
pub struct Resolver {
    client: BrowserClient,
    extractor: Arc<dyn MediaExtractor>,
    debug_sink: Option<Arc<dyn DebugSink>>,
}

impl Resolver {
    /// Resolver with the built-in script patterns and no debug sink.
    pub fn new(client: BrowserClient) -> Result<Self> {
        Ok(Self::with_extractor(
            client,
            Arc::new(ScriptPatternExtractor::new()?),
        ))
    }

    pub fn with_extractor(client: BrowserClient, extractor: Arc<dyn MediaExtractor>) -> Self {
        Self {
            client,
            extractor,
            debug_sink: None,
        }
    }

    /// Dump every fetched page into `sink`.
    #[must_use]
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    /// Fetch `page_url` and extract the media URL from it.
    #[instrument(skip(self), fields(extractor = self.extractor.name()))]
    pub async fn resolve(&self, page_url: &str) -> Result<String> {
        let page_url = validate_page_url(page_url)?;
        info!("Processing URL: {}", page_url);

        let html = self.client.fetch_page(page_url.as_str()).await?;

        if let Some(sink) = &self.debug_sink {
            sink.record(&html, &script_blocks(&html)).await;
        }

        match self.extractor.extract(&html) {
            Ok(url) => {
                info!("Found video URL: {}", url);
                Ok(url)
            }
            Err(e) => {
                warn!(bytes = html.len(), "No video URL found in the page");
                Err(e)
            }
        }
    }
}

/// Trimmed, absolute `http`/`https` URL.
fn validate_page_url(raw: &str) -> Result<url::Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GrabError::InvalidInput("URL is required".to_string()));
    }
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| GrabError::InvalidInput(format!("Invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(GrabError::InvalidInput(format!(
            "Unsupported URL scheme: {other}"
        ))),
    }
}
