use crate::catalog::{MemoryStore, TrackStore};
use crate::config::Config;
use crate::relay::{self, UpstreamFetcher};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod routes_api;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub state: Arc<AppState>,
    /// Media locator collaborator; the relay only sees the trait.
    pub catalog: Arc<dyn TrackStore>,
    /// Upstream HTTP client, constructed once and injected.
    pub fetcher: Arc<UpstreamFetcher>,
}

impl AppContext {
    /// Build a context from config: fresh state, a catalog seeded with the
    /// configured tracks, and a newly constructed upstream client.
    pub fn from_config(config: Config) -> Self {
        let state = Arc::new(AppState::new());
        let catalog: Arc<dyn TrackStore> =
            Arc::new(MemoryStore::with_tracks(config.tracks.clone()));
        let fetcher = Arc::new(UpstreamFetcher::new(&config.upstream));

        Self {
            config: Arc::new(config),
            state,
            catalog,
            fetcher,
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // JSON API routes
        .nest("/api", routes_api::api_routes())
        // Relay routes
        .nest("/stream", relay::stream_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::from_config(config);
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
