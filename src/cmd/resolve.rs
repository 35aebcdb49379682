use anyhow::Result;

use vidgrab::{build_pipeline, Config};

pub async fn cmd_resolve(config: &Config, url: &str) -> Result<()> {
    let (resolver, _) = build_pipeline(config)?;
    let video_url = resolver.resolve(url).await?;
    println!("{video_url}");
    Ok(())
}
