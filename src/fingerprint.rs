//! Browser Fingerprint
//!
//! Builds the request headers a desktop Chrome sends, in two flavours:
//! a top-level document navigation (page fetch) and a cross-site `<video>`
//! load (media probe and download). Video hosts reject requests that look
//! like scripts, so both sets mimic what the browser really sends.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, RANGE,
    REFERER, USER_AGENT,
};

/// Referer sent with media requests unless configured otherwise.
pub const DEFAULT_REFERER: &str = "https://www.facebook.com/";

const DOCUMENT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Real Chrome versions (major, full)
const CHROME_VERSIONS: &[(&str, &str)] = &[
    ("131", "131.0.0.0"),
    ("130", "130.0.0.0"),
    ("129", "129.0.0.0"),
    ("128", "128.0.0.0"),
    ("120", "120.0.0.0"),
];

const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.9",
    "en-US,en;q=0.9,es;q=0.8",
];

/// Platform configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    fn random() -> Self {
        let mut rng = rand::thread_rng();
        // Realistic distribution: Windows 65%, macOS 20%, Linux 15%
        let roll: f32 = rng.gen();
        if roll < 0.65 {
            Platform::Windows
        } else if roll < 0.85 {
            Platform::MacOS
        } else {
            Platform::Linux
        }
    }

    fn os_string(self) -> &'static str {
        match self {
            Platform::MacOS => "Macintosh; Intel Mac OS X 10_15_7",
            Platform::Windows => "Windows NT 10.0; Win64; x64",
            Platform::Linux => "X11; Linux x86_64",
        }
    }
}

/// Browser identity used for every upstream request of one client.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept_language: String,
    /// Sent as `Referer` on media requests.
    pub referer: String,
}

impl BrowserProfile {
    /// Chrome on the given platform and full version string.
    #[must_use]
    pub fn chrome(platform: Platform, version: &str) -> Self {
        Self {
            user_agent: format!(
                "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{version} Safari/537.36",
                platform.os_string()
            ),
            accept_language: ACCEPT_LANGUAGES[0].to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }

    /// Override the media `Referer`.
    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Headers for fetching an HTML page as a top-level navigation.
    pub fn page_headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(DOCUMENT_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&self.accept_language)?);
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
        headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
        Ok(headers)
    }

    /// Headers for probing and downloading a media file the way a `<video>`
    /// element embedded on the source site would.
    pub fn media_headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        // Identity keeps Content-Length equal to the bytes we will receive
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static("identity;q=1, *;q=0"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&self.accept_language)?);
        headers.insert(RANGE, HeaderValue::from_static("bytes=0-"));
        headers.insert(REFERER, HeaderValue::from_str(&self.referer)?);
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("video"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("no-cors"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
        Ok(headers)
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::chrome(Platform::MacOS, "120.0.0.0")
    }
}

/// Generate a realistic Chrome profile with a random platform, version and
/// language.
#[must_use]
pub fn chrome_profile() -> BrowserProfile {
    let mut rng = rand::thread_rng();
    let (_, full) = CHROME_VERSIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or(("120", "120.0.0.0"));
    let mut profile = BrowserProfile::chrome(Platform::random(), full);
    if let Some(lang) = ACCEPT_LANGUAGES.choose(&mut rng) {
        profile.accept_language = (*lang).to_string();
    }
    profile
}
