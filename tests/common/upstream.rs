//! In-process stand-in for the social media site and its video CDN.
//!
//! Serves a handful of fixed pages and media files on `127.0.0.1:0` and
//! counts `HEAD`/`GET` hits so tests can assert which requests were made.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::stream::{self, StreamExt};
use tokio::net::TcpListener;

/// Size of the `/media/*` bodies.
pub const CLIP_LEN: usize = 20_000;

/// How long `/slow/*` routes stall before answering.
pub const STALL: Duration = Duration::from_secs(5);

/// Size `/media/huge` claims on `HEAD`, above the default ceiling.
pub const HUGE_LEN: u64 = 600_000_000;

/// Bytes `/slow/body` sends before stalling.
pub const FIRST_CHUNK: usize = 100;

#[derive(Debug, Default)]
pub struct Hits {
    pub head: AtomicUsize,
    pub get: AtomicUsize,
}

impl Hits {
    pub fn heads(&self) -> usize {
        self.head.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }

    fn record(&self, method: &Method) {
        if *method == Method::HEAD {
            self.head.fetch_add(1, Ordering::SeqCst);
        } else {
            self.get.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub struct Upstream {
    pub base: String,
    pub hits: Arc<Hits>,
}

impl Upstream {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

/// Deterministic, non-repeating-looking body so truncation would show.
pub fn clip() -> Vec<u8> {
    (0..CLIP_LEN).map(|i| (i % 251) as u8).collect()
}

pub const HD_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Watch</title>
<script src="/static/app.js"></script>
<script>window.__cfg = {"locale":"en_US"};</script>
</head><body>
<script type="application/json">{"playable_url":"https:\/\/cdn.example.com\/sd.mp4","playable_url_quality_hd":"https:\/\/cdn.example.com\/hd_clip.mp4?token=abc"}</script>
<script>{"dash_url":"https:\/\/cdn.example.com\/manifest.mpd"}</script>
</body></html>"#;

pub const EMPTY_PAGE: &str = r#"<!DOCTYPE html>
<html><head><script>console.log("no video here");</script></head>
<body><p>"playable_url":"https://cdn.example.com/outside.mp4"</p></body></html>"#;

/// Start the upstream and return its base URL (no trailing slash).
pub async fn start() -> Upstream {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/watch/hd", get(|| async { Html(HD_PAGE) }))
        .route("/watch/empty", get(|| async { Html(EMPTY_PAGE) }))
        .route(
            "/watch/removed",
            get(|| async { (StatusCode::NOT_FOUND, Html("<html>gone</html>")) }),
        )
        .route("/media/abc123", get(media))
        .route("/media/clip.mp4", get(media))
        .route("/media/forbidden", get(forbidden))
        .route("/media/gone", get(gone))
        .route("/media/partial", get(partial))
        .route("/media/head-only", get(head_only))
        .route("/media/no-length", get(no_length))
        .route("/media/huge", get(huge))
        .route("/slow/body", get(slow_body))
        .route("/slow/media", get(slow))
        .route("/slow/page", get(slow))
        .with_state(Arc::clone(&hits));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        base: format!("http://{addr}"),
        hits,
    }
}

async fn media(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    ([(CONTENT_TYPE, "video/mp4")], clip()).into_response()
}

async fn forbidden(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    StatusCode::FORBIDDEN.into_response()
}

async fn gone(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    StatusCode::GONE.into_response()
}

/// A CDN honouring `Range` on HEAD; still not a plain 200.
async fn partial(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    StatusCode::PARTIAL_CONTENT.into_response()
}

/// Probe succeeds, the download itself is refused.
async fn head_only(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    if method == Method::HEAD {
        ([(CONTENT_TYPE, "video/mp4")], clip()).into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

async fn slow(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    tokio::time::sleep(STALL).await;
    ([(CONTENT_TYPE, "video/mp4")], clip()).into_response()
}

/// Chunked body, no `Content-Length` on either method.
async fn no_length(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    let chunks: Vec<Result<Bytes, std::io::Error>> = clip()
        .chunks(CLIP_LEN / 4)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    (
        [(CONTENT_TYPE, "video/mp4")],
        Body::from_stream(stream::iter(chunks)),
    )
        .into_response()
}

/// `HEAD` reports a size over the ceiling; `GET` would serve a small clip.
async fn huge(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    if method == Method::HEAD {
        (
            [
                (CONTENT_TYPE, "video/mp4".to_string()),
                (CONTENT_LENGTH, HUGE_LEN.to_string()),
            ],
            Body::empty(),
        )
            .into_response()
    } else {
        ([(CONTENT_TYPE, "video/mp4")], clip()).into_response()
    }
}

/// Headers and a first chunk arrive promptly, then the body stalls.
async fn slow_body(method: Method, State(hits): State<Arc<Hits>>) -> Response {
    hits.record(&method);
    if method == Method::HEAD {
        return ([(CONTENT_TYPE, "video/mp4")], clip()).into_response();
    }

    let data = clip();
    let first = Bytes::copy_from_slice(&data[..FIRST_CHUNK]);
    let rest = Bytes::copy_from_slice(&data[FIRST_CHUNK..]);
    let body = stream::once(async move { Ok::<_, std::io::Error>(first) }).chain(stream::once(
        async move {
            tokio::time::sleep(STALL).await;
            Ok(rest)
        },
    ));
    ([(CONTENT_TYPE, "video/mp4")], Body::from_stream(body)).into_response()
}
