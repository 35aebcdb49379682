//! `vidgrab` - Direct video URLs from social media pages
//!
//! # Pipeline
//!
//! - **Resolver**: fetch a page with browser headers, scan its inline
//!   scripts with an ordered list of patterns, return the media URL
//! - **Fetcher**: probe the media URL, enforce the size ceiling, download
//!   it into memory with a derived filename
//! - **Server**: `axum` API exposing both steps to a browser front end
//!
//! # Example
//!
//! ```rust,no_run
//! use vidgrab::{BrowserClient, Fetcher, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BrowserClient::new()?;
//!     let video_url = Resolver::new(client.clone())?
//!         .resolve("https://www.facebook.com/watch/?v=123")
//!         .await?;
//!     let media = Fetcher::new(client).fetch(&video_url).await?;
//!     println!("{} ({} bytes)", media.filename, media.bytes.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod http_client;
pub mod resolve;
pub mod server;

use std::sync::Arc;

pub use config::Config;
pub use error::{GrabError, Result};
pub use fetch::{filename_from_url, DownloadedMedia, Fetcher};
pub use fingerprint::{chrome_profile, BrowserProfile};
pub use http_client::BrowserClient;
pub use resolve::{DebugSink, DirectorySink, MediaExtractor, Resolver, ScriptPatternExtractor};
pub use server::AppState;

/// Version of vidgrab
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the resolver and fetcher described by `config`.
pub fn build_pipeline(config: &Config) -> Result<(Resolver, Fetcher)> {
    let profile = chrome_profile().with_referer(config.http.referer.clone());
    let client = BrowserClient::with_profile(profile, config.http.timeout())?;

    let extractor = if config.resolver.patterns.is_empty() {
        ScriptPatternExtractor::new()?
    } else {
        ScriptPatternExtractor::with_patterns(&config.resolver.patterns)?
    };

    let mut resolver = Resolver::with_extractor(client.clone(), Arc::new(extractor));
    if let Some(dir) = &config.debug.dir {
        resolver = resolver.with_debug_sink(Arc::new(DirectorySink::new(dir)));
    }

    let fetcher = Fetcher::new(client).with_max_bytes(config.fetch.max_bytes);
    Ok((resolver, fetcher))
}
