//! Client-facing partial response composition.

use axum::http::{header, StatusCode};
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::relay::pump;
use crate::relay::upstream::UpstreamPartial;
use crate::state::AppState;

/// Build the client-facing 206 from an upstream partial answer, wiring its
/// body through the streaming pump.
///
/// `Content-Range` is copied verbatim from the upstream: stores may clamp a
/// requested window, and only they know what they actually served.
/// `Vary: Range` keeps shared caches from reusing one byte window for a
/// request naming another.
pub fn partial_response(
    partial: UpstreamPartial,
    content_type: String,
    cache_max_age_secs: u64,
    idle_timeout: Duration,
    state: Arc<AppState>,
) -> Result<Response> {
    let UpstreamPartial {
        content_range,
        content_length,
        body,
        ..
    } = partial;

    let body = pump::relay_body(body, idle_timeout, state);

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_RANGE, content_range)
        .header(header::CONTENT_LENGTH, content_length.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={cache_max_age_secs}"),
        )
        .header(header::VARY, "Range")
        .body(body)
        .map_err(|e| Error::Internal(format!("failed to build partial response: {e}")))
}

/// Resolve the Content-Type for a partial response.
///
/// The upstream's own header wins; otherwise the track's stored format is
/// mapped; otherwise the configured default applies.
pub fn resolve_content_type(
    upstream: Option<&str>,
    format: Option<&str>,
    default_type: &str,
) -> String {
    if let Some(ct) = upstream {
        if !ct.trim().is_empty() {
            return ct.to_string();
        }
    }

    format
        .and_then(content_type_for_format)
        .unwrap_or(default_type)
        .to_string()
}

/// Map a stored container/codec hint to a MIME type.
fn content_type_for_format(format: &str) -> Option<&'static str> {
    match format.to_ascii_lowercase().as_str() {
        "mp3" | "mpeg" => Some("audio/mpeg"),
        "m4a" | "mp4" | "aac" => Some("audio/mp4"),
        "flac" => Some("audio/flac"),
        "ogg" | "oga" | "vorbis" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "wav" => Some("audio/wav"),
        "webm" => Some("audio/webm"),
        _ => None,
    }
}
