//! Error taxonomy shared by the resolver, the fetcher and the HTTP layer.
//!
//! Every variant is a terminal, client-visible condition. Nothing in the
//! pipeline retries; the server maps each variant to one status code.

use http::StatusCode;
use thiserror::Error;

/// Errors produced while resolving or downloading media.
#[derive(Error, Debug)]
pub enum GrabError {
    /// Missing or malformed URL, rejected before any network call.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Request timed out while contacting the upstream server")]
    Timeout,

    #[error("Failed to connect to upstream server")]
    Unreachable,

    #[error("Access denied. The video URL might have expired or requires authentication.")]
    AccessDenied,

    #[error("Failed to access video: HTTP {0}")]
    UpstreamStatus(u16),

    /// The page itself answered with a non-2xx status.
    #[error("Failed to load page: HTTP {0}")]
    PageStatus(u16),

    #[error("Video file is too large to download ({size} bytes, limit {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("Could not find video URL in the page. This might be due to content protection.")]
    NotFound,

    /// Anything unexpected. The context is for server-side logs only.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GrabError>;

impl GrabError {
    /// HTTP status the server answers with for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Unreachable => StatusCode::BAD_GATEWAY,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::UpstreamStatus(code) | Self::PageStatus(code) => upstream_status(*code),
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message safe to hand to a client.
    ///
    /// Identical to `Display` except for [`GrabError::Internal`], whose
    /// context never leaves the server, and [`GrabError::TooLarge`], whose
    /// sizes are logged rather than returned.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::TooLarge { .. } => "Video file is too large to download".to_string(),
            other => other.to_string(),
        }
    }
}

/// Upstream 4xx/5xx codes pass through; anything else is a bad gateway.
fn upstream_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl From<reqwest::Error> for GrabError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unreachable
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<std::io::Error> for GrabError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            return Self::Timeout;
        }
        // StreamReader wraps body errors as io::Error; recover the reqwest cause.
        match err.into_inner() {
            Some(inner) => match inner.downcast::<reqwest::Error>() {
                Ok(req) => Self::from(*req),
                Err(other) => Self::Internal(other.to_string()),
            },
            None => Self::Internal("I/O error while reading response body".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(
            GrabError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GrabError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(GrabError::Unreachable.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(GrabError::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            GrabError::TooLarge { size: 2, max: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(GrabError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            GrabError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_status_passes_error_codes_through() {
        assert_eq!(GrabError::UpstreamStatus(410).status(), StatusCode::GONE);
        assert_eq!(
            GrabError::UpstreamStatus(503).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn upstream_status_non_error_codes_become_bad_gateway() {
        assert_eq!(GrabError::UpstreamStatus(206).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(GrabError::UpstreamStatus(302).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_status_detail_carries_code() {
        assert_eq!(
            GrabError::UpstreamStatus(404).detail(),
            "Failed to access video: HTTP 404"
        );
    }

    #[test]
    fn page_status_names_the_page() {
        let err = GrabError::PageStatus(404);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "Failed to load page: HTTP 404");
        assert!(!err.detail().contains("video"));
        assert_eq!(GrabError::PageStatus(301).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_detail_hides_context() {
        let err = GrabError::Internal("secret stack trace".into());
        assert!(!err.detail().contains("secret"));
        assert!(err.to_string().contains("secret"));
    }

    #[test]
    fn timed_out_io_error_is_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(matches!(GrabError::from(io), GrabError::Timeout));
    }
}
