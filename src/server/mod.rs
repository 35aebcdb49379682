//! HTTP API over the resolver and the fetcher.
//!
//! - `POST /api/get-video`: page URL → direct media URL
//! - `GET /api/download?video_url=`: direct media URL → attachment
//! - `GET /`, `GET /test`: liveness
//!
//! Requests share nothing but the [`AppState`] clients.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::fetch::Fetcher;
use crate::resolve::Resolver;

pub use handlers::{ErrorBody, StatusBody, VideoRequest, VideoResponse};

/// Shared, immutable per-process state.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub fetcher: Arc<Fetcher>,
}

impl AppState {
    pub fn new(resolver: Resolver, fetcher: Fetcher) -> Self {
        Self {
            resolver: Arc::new(resolver),
            fetcher: Arc::new(fetcher),
        }
    }
}

/// Build the API router with CORS restricted to `allowed_origin`.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router> {
    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/test", get(handlers::test_endpoint))
        .route("/api/get-video", post(handlers::get_video))
        .route("/api/download", get(handlers::download))
        .with_state(state)
        .layer(cors_layer(allowed_origin)?)
        .layer(TraceLayer::new_for_http()))
}

/// One origin, credentials allowed, any method and request header.
///
/// Wildcards cannot be combined with credentials, so methods and headers
/// mirror the preflight request instead. Other origins get no CORS headers.
fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("invalid CORS origin: {allowed_origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([
            CONTENT_DISPOSITION,
            CONTENT_LENGTH,
            HeaderName::from_static("content-range"),
            CONTENT_TYPE,
        ]))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr, allowed_origin: &str) -> Result<()> {
    let app = router(state, allowed_origin)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(origin = allowed_origin, "Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
