//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which starts the relay on a random port next to
//! a wiremock upstream standing in for the object store, plus [`RangeStore`],
//! a store double that honors single byte ranges the way real stores do
//! (including clamping windows past EOF).

use std::net::SocketAddr;

use tunerelay::catalog::Track;
use tunerelay::config::Config;
use tunerelay::server::{create_router, AppContext};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Test harness wrapping a running relay and its mock upstream store.
pub struct TestHarness {
    pub ctx: AppContext,
    pub upstream: MockServer,
    pub addr: SocketAddr,
}

impl TestHarness {
    /// Start a harness with default configuration.
    pub async fn start() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Start a harness with a custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let upstream = MockServer::start().await;
        let ctx = AppContext::from_config(config);
        let app = create_router(ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { ctx, upstream, addr }
    }

    /// Register a track whose source lives on the mock upstream.
    pub async fn add_track(&self, id: &str, source_path: &str, active: bool) -> Track {
        let track = Track {
            id: id.to_string(),
            title: None,
            source_url: format!("{}{}", self.upstream.uri(), source_path),
            format: None,
            active,
        };
        self.ctx
            .catalog
            .insert(track.clone())
            .await
            .expect("failed to insert track");
        track
    }

    /// Serve `data` at `source_path` on the mock upstream with range support.
    pub async fn mount_media(&self, source_path: &str, data: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(source_path))
            .respond_with(RangeStore { data })
            .mount(&self.upstream)
            .await;
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// HTTP client that does not follow redirects, so redirect responses can
    /// be asserted directly.
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build test client")
    }
}

/// Upstream store double: serves single byte ranges as 206 with
/// `Content-Range`, clamps windows past EOF, and falls back to a full 200
/// when no usable Range header arrives.
pub struct RangeStore {
    pub data: Vec<u8>,
}

impl Respond for RangeStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let size = self.data.len() as u64;
        let range = request
            .headers
            .get("range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_single_range);

        match range {
            Some((start, end_opt)) if start < size => {
                let end = end_opt.unwrap_or(size - 1).min(size - 1);
                let body = self.data[start as usize..=end as usize].to_vec();
                ResponseTemplate::new(206)
                    .insert_header(
                        "Content-Range",
                        format!("bytes {start}-{end}/{size}").as_str(),
                    )
                    .insert_header("Content-Type", "audio/mpeg")
                    .set_body_bytes(body)
            }
            _ => ResponseTemplate::new(200)
                .insert_header("Content-Type", "audio/mpeg")
                .set_body_bytes(self.data.clone()),
        }
    }
}

fn parse_single_range(value: &str) -> Option<(u64, Option<u64>)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    let start = start.parse().ok()?;
    let end = if end.is_empty() {
        None
    } else {
        Some(end.parse().ok()?)
    };
    Some((start, end))
}
