//! Ranged fetches against the upstream media store.
//!
//! One [`UpstreamFetcher`] is constructed at startup and shared by all
//! requests; its connection pool is safe for concurrent use. Nothing here
//! retries: a half-consumed partial stream cannot be retried safely, so
//! retry policy stays with the caller (in practice, the media player).

use reqwest::header;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::relay::range::{parse_content_range, RangeSpec};

/// The upstream's answer to a ranged fetch. The upstream is authoritative on
/// the window it actually served: `content_range` is re-emitted to the
/// client verbatim, never recomputed from the original request.
pub struct UpstreamPartial {
    /// Verbatim `Content-Range` header value.
    pub content_range: String,
    /// Length of the served window (not the full file size).
    pub content_length: u64,
    /// Upstream-declared media type, if any.
    pub content_type: Option<String>,
    /// The undrained response; its body is the byte stream to relay.
    pub body: reqwest::Response,
}

/// Shared HTTP client for the upstream store.
pub struct UpstreamFetcher {
    client: Client,
    connect_timeout: Duration,
}

impl UpstreamFetcher {
    /// Build the shared client. The connect phase gets a hard timeout; body
    /// reads get no total cap here (the pump applies an idle timeout
    /// instead), since media files legitimately take long to transfer.
    pub fn new(config: &UpstreamConfig) -> Self {
        let connect_timeout = config.connect_timeout();
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with connect timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            connect_timeout,
        }
    }

    /// Issue a conditional GET for `range` against `source_url`.
    ///
    /// Succeeds only when the upstream commits to verifiable partial
    /// content: a 206 carrying a `Content-Range` header. A 2xx without that
    /// framing surfaces as [`Error::FullContentOnly`]; transport failures
    /// and error statuses surface as [`Error::UpstreamUnreachable`].
    pub async fn fetch_range(&self, source_url: &str, range: &RangeSpec) -> Result<UpstreamPartial> {
        tracing::debug!(
            url = source_url,
            range = %range.to_header_value(),
            timeout_secs = self.connect_timeout.as_secs(),
            "fetching range from upstream"
        );

        let response = self
            .client
            .get(source_url)
            .header(header::RANGE, range.to_header_value())
            .send()
            .await
            .map_err(|e| Error::UpstreamUnreachable(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::PARTIAL_CONTENT {
            let Some(content_range) = response
                .headers()
                .get(header::CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
            else {
                // A 206 without Content-Range asserts a window it never
                // names; treat it like a store that cannot do partials.
                tracing::warn!(url = source_url, "upstream sent 206 without Content-Range");
                return Err(Error::FullContentOnly);
            };

            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let content_length = response
                .content_length()
                .or_else(|| parse_content_range(&content_range).map(|cr| cr.len()))
                .ok_or_else(|| {
                    Error::UpstreamUnreachable(format!(
                        "upstream reported no usable window length in '{content_range}'"
                    ))
                })?;

            Ok(UpstreamPartial {
                content_range,
                content_length,
                content_type,
                body: response,
            })
        } else if status.is_success() {
            tracing::debug!(url = source_url, status = %status, "upstream ignored Range header");
            Err(Error::FullContentOnly)
        } else {
            Err(Error::UpstreamUnreachable(format!(
                "upstream returned {status}"
            )))
        }
    }
}
