//! Audio range-request streaming relay.
//!
//! Lets a browser `<audio>` element seek within a track whose bytes live in
//! a remote object store, without handing out an unmetered direct link on
//! the hot path. The client's `Range` header is translated into an
//! equivalent upstream request, the upstream's partial answer is re-framed
//! verbatim as a 206, and the body is pumped through under backpressure.
//! When partial delivery is impossible the relay degrades to a redirect at
//! the source URL.
//!
//! # Routes
//!
//! - `GET /stream/{track_id}` - ranged streaming with redirect fallback
//!
//! # Per-request state machine
//!
//! lookup → (no/unusable Range → redirect) → upstream fetch →
//! (fetch failed → redirect) → compose 206 → pump → done.

mod pump;
mod range;
mod respond;
mod stream;
mod upstream;

pub use range::{parse_content_range, parse_range_header, ContentRange, RangeSpec};
pub use respond::resolve_content_type;
pub use stream::{relay_track, stream_track, RelayOutcome};
pub use upstream::{UpstreamFetcher, UpstreamPartial};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create the streaming router.
pub fn stream_router() -> Router<AppContext> {
    Router::new().route("/:track_id", get(stream_track))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_router_creation() {
        let _router: Router<AppContext> = stream_router();
    }
}
