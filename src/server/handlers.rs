use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header::{
    ACCEPT_RANGES, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::AppState;
use crate::error::GrabError;
use crate::fetch::content_disposition;

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoResponse {
    pub success: bool,
    pub video_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DownloadQuery {
    video_url: Option<String>,
}

impl IntoResponse for GrabError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, "{}", self);
        } else {
            warn!(status = %status, "{}", self);
        }
        (status, Json(ErrorBody { detail: self.detail() })).into_response()
    }
}

pub(super) async fn root() -> Json<StatusBody> {
    Json(StatusBody {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

pub(super) async fn test_endpoint() -> Json<StatusBody> {
    Json(StatusBody {
        status: "ok".to_string(),
        message: "Test endpoint is working".to_string(),
    })
}

pub(super) async fn get_video(
    State(state): State<AppState>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<VideoResponse>, GrabError> {
    let Json(request) =
        payload.map_err(|e| GrabError::InvalidInput(format!("Invalid request body: {}", e.body_text())))?;

    let video_url = state.resolver.resolve(&request.url).await?;
    Ok(Json(VideoResponse {
        success: true,
        video_url,
    }))
}

pub(super) async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, GrabError> {
    let video_url = query.video_url.unwrap_or_default();
    info!("Downloading video from: {}", video_url);

    let media = state.fetcher.fetch(&video_url).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&media.filename))
        .map_err(|e| GrabError::Internal(format!("invalid Content-Disposition: {e}")))?;
    let length = media.bytes.len();

    Ok((
        StatusCode::OK,
        [
            (CONTENT_DISPOSITION, disposition),
            (CONTENT_TYPE, HeaderValue::from_static(media.content_type)),
            (CONTENT_LENGTH, HeaderValue::from(length)),
            (ACCEPT_RANGES, HeaderValue::from_static("bytes")),
            (CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        Body::from(media.bytes),
    )
        .into_response())
}
