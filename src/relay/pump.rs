//! Byte transfer from the upstream body to the client body.
//!
//! The pump never holds more than one in-flight chunk: the client's poll
//! drives the next upstream read, so a slow client slows the upstream read
//! rather than growing a buffer. If the client disconnects, axum drops the
//! stream, which drops the upstream response and closes its connection.

use axum::body::Body;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

/// Wrap an upstream response body as a client response body.
///
/// Each chunk read is guarded by `idle_timeout`; a stalled or failed read
/// after this point cannot produce an error response (headers are already
/// committed), so the stream simply ends and the client sees a truncated
/// body. Browsers re-request the missing tail with a new Range.
pub fn relay_body(upstream: reqwest::Response, idle_timeout: Duration, state: Arc<AppState>) -> Body {
    let stream = async_stream::stream! {
        let mut upstream = upstream;
        loop {
            match tokio::time::timeout(idle_timeout, upstream.chunk()).await {
                Ok(Ok(Some(chunk))) => {
                    state.record_relayed_bytes(chunk.len() as u64);
                    yield Ok::<Bytes, std::io::Error>(chunk);
                }
                Ok(Ok(None)) => break,
                Ok(Err(e)) => {
                    state.record_stream_failure();
                    tracing::warn!("Upstream read failed mid-stream, truncating: {}", e);
                    break;
                }
                Err(_) => {
                    state.record_stream_failure();
                    tracing::warn!(
                        idle_secs = idle_timeout.as_secs(),
                        "Upstream read stalled, truncating"
                    );
                    break;
                }
            }
        }
    };

    Body::from_stream(stream)
}
