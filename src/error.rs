//! Unified error type for the tunerelay application.
//!
//! All modules funnel their failures into [`Error`], which carries enough
//! context for the HTTP boundary to derive a status code via
//! [`Error::http_status`]. The degraded-delivery variants (bad range headers,
//! unreachable upstream) are normally consumed by the stream handler and
//! turned into a redirect before they ever reach a client.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type covering all failure modes in tunerelay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "track").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The track exists but is not cleared for playback.
    #[error("track is not active: {0}")]
    TrackInactive(String),

    /// The Range header could not be parsed.
    #[error("malformed range header: {0}")]
    MalformedRange(String),

    /// The Range header requested more than one byte window.
    #[error("multi-range requests are not supported: {0}")]
    UnsupportedMultiRange(String),

    /// The upstream store could not be reached or answered with an error.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The upstream answered, but without usable partial-content framing.
    #[error("upstream did not honor partial content")]
    FullContentOnly,

    /// Request data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::TrackInactive(_) => StatusCode::FORBIDDEN,
            Error::MalformedRange(_) => StatusCode::BAD_REQUEST,
            Error::UnsupportedMultiRange(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Error::FullContentOnly => StatusCode::BAD_GATEWAY,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether full-file delivery via a direct redirect is a safe substitute
    /// for this failure. Holds for unusable range headers and for any
    /// upstream fetch failure that occurred before headers were sent.
    pub fn degrades_to_redirect(&self) -> bool {
        matches!(
            self,
            Error::MalformedRange(_)
                | Error::UnsupportedMultiRange(_)
                | Error::UpstreamUnreachable(_)
                | Error::FullContentOnly
        )
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper implementing `IntoResponse` so route handlers can return
/// `Result<T, AppError>` directly.
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.http_status();

        let code = match &self.0 {
            Error::NotFound { .. } => "not_found",
            Error::TrackInactive(_) => "track_inactive",
            Error::MalformedRange(_) => "malformed_range",
            Error::UnsupportedMultiRange(_) => "unsupported_multi_range",
            Error::UpstreamUnreachable(_) => "upstream_unreachable",
            Error::FullContentOnly => "full_content_only",
            Error::Validation(_) => "validation_error",
            Error::Internal(_) => "internal_error",
        };

        // Server-error bodies stay generic; the real cause (which may name
        // upstream hosts) goes to the log only.
        let message = if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "server error in handler");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
