//! Script-pattern media extraction.
//!
//! Pages embed their player configuration as JSON inside inline `<script>`
//! blocks. Each [`MediaPattern`] targets one named video URL field; the list
//! order is the quality preference.

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;

use super::MediaExtractor;
use crate::error::{GrabError, Result};

/// Built-in patterns, highest quality first. Capture group 1 is the URL.
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("playable_url_quality_hd", r#"playable_url_quality_hd":"([^"]+)""#),
    ("playable_url", r#"playable_url":"([^"]+)""#),
    ("video_url", r#""video_url":"([^"]+)""#),
    ("video_object_url", r#""video":\{"url":"([^"]+)""#),
    ("hd_src", r#"hd_src:"([^"]+)""#),
    ("sd_src", r#"sd_src:"([^"]+)""#),
    ("browser_native_hd_url", r#""browser_native_hd_url":"([^"]+)""#),
    ("browser_native_sd_url", r#""browser_native_sd_url":"([^"]+)""#),
    ("dash_url", r#""dash_url":"([^"]+)""#),
    ("playback_url", r#""playback_url":"([^"]+)""#),
];

/// Pattern definition as it appears in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PatternSpec {
    pub name: String,
    pub regex: String,
}

/// One named media URL matcher.
#[derive(Debug, Clone)]
pub struct MediaPattern {
    pub name: String,
    regex: Regex,
}

impl MediaPattern {
    /// Compile a pattern. The regex must have at least one capture group.
    pub fn new(name: impl Into<String>, regex: &str) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(regex)
            .map_err(|e| GrabError::InvalidInput(format!("invalid pattern {name}: {e}")))?;
        if regex.captures_len() < 2 {
            return Err(GrabError::InvalidInput(format!(
                "pattern {name} has no capture group"
            )));
        }
        Ok(Self { name, regex })
    }

    /// First capture of this pattern in `text`, unescaped.
    fn find(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| unescape_slashes(m.as_str()))
    }
}

/// Extracts media URLs from inline script blocks with an ordered pattern list.
#[derive(Debug, Clone)]
pub struct ScriptPatternExtractor {
    patterns: Vec<MediaPattern>,
}

impl ScriptPatternExtractor {
    /// Extractor with the built-in pattern list.
    pub fn new() -> Result<Self> {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|(name, re)| MediaPattern::new(*name, re))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Extractor with a replacement pattern list, in priority order.
    pub fn with_patterns(specs: &[PatternSpec]) -> Result<Self> {
        if specs.is_empty() {
            return Err(GrabError::InvalidInput(
                "pattern list must not be empty".to_string(),
            ));
        }
        let patterns = specs
            .iter()
            .map(|spec| MediaPattern::new(spec.name.clone(), &spec.regex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Pattern names in priority order.
    pub fn pattern_names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    /// Test every pattern, in order, against one script block.
    fn match_script(&self, script: &str) -> Option<(&str, String)> {
        self.patterns
            .iter()
            .find_map(|p| p.find(script).map(|url| (p.name.as_str(), url)))
    }

    /// First match in the first script block that matches anything.
    pub fn extract_from_scripts(&self, scripts: &[String]) -> Result<String> {
        for script in scripts {
            if let Some((pattern, url)) = self.match_script(script) {
                tracing::info!(pattern, "Found video URL");
                return Ok(url);
            }
        }
        Err(GrabError::NotFound)
    }
}

impl MediaExtractor for ScriptPatternExtractor {
    fn name(&self) -> &'static str {
        "script-patterns"
    }

    fn extract(&self, html: &str) -> Result<String> {
        self.extract_from_scripts(&script_blocks(html))
    }
}

/// Text of every `<script>` element, in document order.
#[must_use]
pub fn script_blocks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("script") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|script| script.text().collect::<String>())
        .collect()
}

/// JSON-escaped slashes (`\/`) back to `/`.
fn unescape_slashes(raw: &str) -> String {
    raw.replace("\\/", "/")
}
