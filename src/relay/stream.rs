//! The per-request relay state machine and its HTTP handler.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::{AppError, Error, Result};
use crate::relay::{range, respond, upstream::UpstreamPartial};
use crate::server::AppContext;

/// What the relay core hands back to the HTTP boundary for rendering.
/// Failures (unknown track, inactive track, internal errors) travel as
/// [`Error`] instead.
pub enum RelayOutcome {
    /// Serve a 206 built from the upstream's partial answer.
    Partial {
        partial: UpstreamPartial,
        content_type: String,
    },
    /// Send the client straight to the source; degraded but always correct.
    Redirect { location: String },
}

/// Run one request through the relay: locate the track, parse the client
/// range, fetch the equivalent window upstream, and decide between partial
/// delivery and redirect.
///
/// Headers have not been sent to the client at any point in here, so every
/// failure is still recoverable; unusable range headers and upstream fetch
/// failures degrade to [`RelayOutcome::Redirect`] rather than erroring.
pub async fn relay_track(
    ctx: &AppContext,
    track_id: &str,
    range_header: Option<&str>,
) -> Result<RelayOutcome> {
    let track = ctx
        .catalog
        .lookup(track_id)
        .await?
        .ok_or_else(|| Error::not_found("track", track_id))?;

    if !track.active {
        return Err(Error::TrackInactive(track_id.to_string()));
    }

    let spec = match range::parse_range_header(range_header) {
        Ok(Some(spec)) => spec,
        Ok(None) => {
            return Ok(RelayOutcome::Redirect {
                location: track.source_url,
            })
        }
        Err(e) => {
            tracing::debug!(track_id, error = %e, "unusable Range header, degrading to redirect");
            return Ok(RelayOutcome::Redirect {
                location: track.source_url,
            });
        }
    };

    let fetched = ctx.fetcher.fetch_range(&track.source_url, &spec).await;
    match fetched {
        Ok(partial) => {
            let content_type = respond::resolve_content_type(
                partial.content_type.as_deref(),
                track.format.as_deref(),
                &ctx.config.relay.default_content_type,
            );
            Ok(RelayOutcome::Partial {
                partial,
                content_type,
            })
        }
        Err(e) if e.degrades_to_redirect() => {
            tracing::warn!(track_id, error = %e, "upstream fetch failed, degrading to redirect");
            Ok(RelayOutcome::Redirect {
                location: track.source_url,
            })
        }
        Err(e) => Err(e),
    }
}

/// GET /stream/:track_id
///
/// Streams a byte range of the track through the relay, or redirects the
/// client to the source URL when partial delivery is impossible.
pub async fn stream_track(
    State(ctx): State<AppContext>,
    Path(track_id): Path<String>,
    headers: HeaderMap,
) -> std::result::Result<Response, AppError> {
    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    let outcome = relay_track(&ctx, &track_id, range_header)
        .await
        .map_err(|e| {
            ctx.state.record_error();
            AppError::from(e)
        })?;

    match outcome {
        RelayOutcome::Redirect { location } => {
            ctx.state.record_redirect();
            Ok(Redirect::to(&location).into_response())
        }
        RelayOutcome::Partial {
            partial,
            content_type,
        } => {
            ctx.state.record_partial();
            partial_into_response(&ctx, partial, content_type).map_err(|e| {
                ctx.state.record_error();
                AppError::from(e)
            })
        }
    }
}

fn partial_into_response(
    ctx: &AppContext,
    partial: UpstreamPartial,
    content_type: String,
) -> Result<Response> {
    respond::partial_response(
        partial,
        content_type,
        ctx.config.relay.cache_max_age_secs,
        ctx.config.upstream.idle_read_timeout(),
        ctx.state.clone(),
    )
}
