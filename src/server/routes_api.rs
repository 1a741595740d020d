use crate::catalog::Track;
use crate::error::{AppError, Error};
use crate::server::AppContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/tracks", get(list_tracks))
        .route("/tracks", post(register_track))
        .route("/tracks/:id", get(get_track))
        .route("/tracks/:id", delete(delete_track))
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    let stats = ctx.state.snapshot();
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "stats": {
            "partial_responses": stats.partial_responses,
            "redirects": stats.redirects,
            "bytes_relayed": stats.bytes_relayed,
        }
    }))
}

async fn stats(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.state.snapshot())
}

async fn list_tracks(State(ctx): State<AppContext>) -> Result<impl IntoResponse, AppError> {
    let tracks = ctx.catalog.list().await?;
    Ok(Json(tracks))
}

async fn register_track(
    State(ctx): State<AppContext>,
    Json(track): Json<Track>,
) -> Result<impl IntoResponse, AppError> {
    if track.id.trim().is_empty() {
        return Err(Error::Validation("Track id cannot be empty".to_string()).into());
    }

    if !track.source_url.starts_with("http://") && !track.source_url.starts_with("https://") {
        return Err(Error::Validation(format!(
            "Source URL must be HTTP(S): {}",
            track.source_url
        ))
        .into());
    }

    ctx.catalog.insert(track.clone()).await?;
    tracing::info!(track_id = %track.id, "Track registered");

    Ok((StatusCode::CREATED, Json(track)))
}

async fn get_track(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let track = ctx
        .catalog
        .lookup(&id)
        .await?
        .ok_or_else(|| Error::not_found("track", &id))?;
    Ok(Json(track))
}

async fn delete_track(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.catalog.remove(&id).await? {
        return Err(Error::not_found("track", &id).into());
    }
    tracing::info!(track_id = %id, "Track removed");
    Ok(StatusCode::NO_CONTENT)
}
