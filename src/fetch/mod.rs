//! Direct media URL → bytes.
//!
//! Three steps per download, all under the client's timeout:
//! 1. `HEAD` probe with `Range: bytes=0-` (403 and other statuses rejected)
//! 2. Size guard against the reported `Content-Length`
//! 3. Streamed `GET`, read in fixed 8 KiB chunks into one buffer
//!
//! A failure at any point discards everything read so far.

pub mod filename;

use futures::TryStreamExt;
use reqwest::StatusCode;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;
use tracing::{info, instrument, warn};

use crate::error::{GrabError, Result};
use crate::http_client::BrowserClient;

pub use filename::{content_disposition, filename_from_url, DEFAULT_FILENAME};

/// Largest declared media size accepted (500 MiB).
pub const MAX_MEDIA_BYTES: u64 = 500 * 1024 * 1024;

/// Read size for the download loop.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Content type of every downloaded file.
pub const MEDIA_CONTENT_TYPE: &str = "video/mp4";

/// A fully downloaded media file.
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Downloads direct media URLs with probe and size guard.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: BrowserClient,
    max_bytes: u64,
}

impl Fetcher {
    pub fn new(client: BrowserClient) -> Self {
        Self {
            client,
            max_bytes: MAX_MEDIA_BYTES,
        }
    }

    /// Override the size ceiling.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Probe, size-check and download `media_url`.
    #[instrument(skip(self), fields(url = %media_url))]
    pub async fn fetch(&self, media_url: &str) -> Result<DownloadedMedia> {
        validate_media_url(media_url)?;
        let filename = filename_from_url(media_url);
        tracing::debug!("Generated filename: {}", filename);

        self.check(media_url).await?;

        info!("Starting download");
        let bytes = self.download(media_url).await?;
        info!(
            bytes = bytes.len(),
            "Download completed, size: {:.2} MB",
            megabytes(bytes.len() as u64)
        );

        Ok(DownloadedMedia {
            bytes,
            filename,
            content_type: MEDIA_CONTENT_TYPE,
        })
    }

    /// Steps 1 and 2: probe status and declared size.
    async fn check(&self, media_url: &str) -> Result<()> {
        let probe = self.client.probe(media_url).await?;
        match probe.status {
            StatusCode::OK => {}
            StatusCode::FORBIDDEN => return Err(GrabError::AccessDenied),
            other => return Err(GrabError::UpstreamStatus(other.as_u16())),
        }

        if let Some(size) = probe.content_length {
            info!("Video size: {:.2} MB", megabytes(size));
            check_size(size, self.max_bytes)?;
        }
        Ok(())
    }

    /// Step 3: streamed GET into memory.
    async fn download(&self, media_url: &str) -> Result<Vec<u8>> {
        let response = self.client.get_media(media_url).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Download request rejected after successful probe");
            return Err(GrabError::UpstreamStatus(status.as_u16()));
        }

        let capacity = response
            .content_length()
            .filter(|len| *len <= self.max_bytes)
            .map_or(0, |len| usize::try_from(len).unwrap_or(0));
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let reader = StreamReader::new(stream);
        tokio::pin!(reader);

        let mut buffer = Vec::with_capacity(capacity);
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
        }
        Ok(buffer)
    }
}

/// Reject anything that is not an `http(s)://` URL, before any network call.
pub fn validate_media_url(media_url: &str) -> Result<()> {
    if media_url.is_empty() {
        return Err(GrabError::InvalidInput("Video URL is required".to_string()));
    }
    if !(media_url.starts_with("http://") || media_url.starts_with("https://")) {
        return Err(GrabError::InvalidInput("Invalid video URL".to_string()));
    }
    Ok(())
}

/// Size guard for a declared content length.
pub fn check_size(size: u64, max: u64) -> Result<()> {
    if size > max {
        warn!(size, max, "Video file is too large to download");
        return Err(GrabError::TooLarge { size, max });
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
