use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use vidgrab::{build_pipeline, Config};

pub async fn cmd_download(config: &Config, url: &str, output: Option<PathBuf>) -> Result<()> {
    let (_, fetcher) = build_pipeline(config)?;

    let start = Instant::now();
    let media = fetcher.fetch(url).await?;
    let path = output.unwrap_or_else(|| PathBuf::from(&media.filename));

    tokio::fs::write(&path, &media.bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "💾 Saved {} bytes to {} ({:.1}s)",
        media.bytes.len(),
        path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
