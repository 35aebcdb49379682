//! Optional dump of fetched pages for diagnosing extraction failures.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// File name for the raw page markup.
pub const PAGE_FILE: &str = "debug_page.html";
/// File name for the concatenated script blocks.
pub const SCRIPTS_FILE: &str = "debug_scripts.txt";
/// Separator written after every script block.
pub const SCRIPT_SEPARATOR: &str = "\n---\n";

/// Destination for debug artifacts of one resolve.
///
/// Implementations must not fail the resolve; errors are theirs to log.
#[async_trait]
pub trait DebugSink: Send + Sync {
    async fn record(&self, html: &str, scripts: &[String]);
}

/// Writes `debug_page.html` and `debug_scripts.txt` into a directory,
/// overwriting the previous resolve's files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn write(&self, html: &str, scripts: &[String]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(PAGE_FILE), html).await?;

        let mut dump = String::new();
        for script in scripts {
            dump.push_str(script);
            dump.push_str(SCRIPT_SEPARATOR);
        }
        tokio::fs::write(self.dir.join(SCRIPTS_FILE), dump).await
    }
}

#[async_trait]
impl DebugSink for DirectorySink {
    async fn record(&self, html: &str, scripts: &[String]) {
        match self.write(html, scripts).await {
            Ok(()) => tracing::debug!(dir = %self.dir.display(), "Wrote debug artifacts"),
            Err(e) => tracing::warn!(
                dir = %self.dir.display(),
                "Failed to write debug artifacts: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_page_and_separated_scripts() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("nested"));

        sink.record("<html></html>", &["a()".to_string(), "b()".to_string()])
            .await;

        let page = std::fs::read_to_string(sink.dir().join(PAGE_FILE)).unwrap();
        let scripts = std::fs::read_to_string(sink.dir().join(SCRIPTS_FILE)).unwrap();
        assert_eq!(page, "<html></html>");
        assert_eq!(scripts, "a()\n---\nb()\n---\n");
    }

    #[tokio::test]
    async fn unwritable_directory_does_not_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        // A regular file in place of the directory makes create_dir_all fail
        DirectorySink::new(&file).record("<html>", &[]).await;
        assert_eq!(std::fs::read(&file).unwrap(), b"x");
    }
}
