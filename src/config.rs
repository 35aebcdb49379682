//! Configuration loaded from `~/.config/vidgrab/config.toml`.
//!
//! Every key is optional; a missing default file means built-in defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::MAX_MEDIA_BYTES;
use crate::fingerprint::DEFAULT_REFERER;
use crate::resolve::PatternSpec;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8001";
/// Default single allowed CORS origin.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub fetch: FetchConfig,
    pub debug: DebugConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8001))),
            allowed_origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub referer: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_MEDIA_BYTES,
        }
    }
}

/// Debug artifacts are written only when `dir` is set.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    pub dir: Option<PathBuf>,
}

/// Replacement pattern list; empty keeps the built-in one.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub patterns: Vec<PatternSpec>,
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }
        Ok(config)
    }
}

/// Return the path to the default config file.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidgrab")
        .join("config.toml")
}
