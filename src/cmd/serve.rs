use anyhow::Result;

use vidgrab::server::{self, AppState};
use vidgrab::{build_pipeline, Config};

pub async fn cmd_serve(config: &Config) -> Result<()> {
    let (resolver, fetcher) = build_pipeline(config)?;
    if let Some(dir) = &config.debug.dir {
        tracing::info!("Debug artifacts enabled in {}", dir.display());
    }

    let state = AppState::new(resolver, fetcher);
    server::serve(state, config.server.bind, &config.server.allowed_origin).await
}
