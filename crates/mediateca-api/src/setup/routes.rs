//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::constants;
use crate::handlers::{albums, audios, health, texts, uploads, videos, vtt_tracks};
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Json, Router,
};
use mediateca_core::ArchiveConfig;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Headroom on top of the largest upload ceiling for multipart framing and
/// metadata fields.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &ArchiveConfig, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api = Router::new()
        .route("/texts", post(texts::upload_text).get(texts::list_texts))
        .route(
            "/texts/{id}",
            get(texts::get_text)
                .patch(texts::update_text)
                .delete(texts::delete_text),
        )
        .route("/videos", post(videos::upload_video).get(videos::list_videos))
        .route(
            "/videos/{id}",
            get(videos::get_video).delete(videos::delete_video),
        )
        .route(
            "/videos/{id}/vtt-tracks",
            post(vtt_tracks::upload_vtt_track).get(vtt_tracks::list_vtt_tracks),
        )
        .route("/vtt-tracks/{id}", delete(vtt_tracks::delete_vtt_track))
        .route("/audio", post(audios::upload_audio).get(audios::list_audio))
        .route(
            "/audio/{id}",
            get(audios::get_audio).delete(audios::delete_audio),
        )
        .route(
            "/audio-albums",
            post(albums::create_album).get(albums::list_albums),
        )
        .route(
            "/audio-albums/{id}",
            get(albums::get_album).delete(albums::delete_album),
        )
        .route("/audio-albums/{id}/tracks", post(albums::upload_track))
        .route("/tracks/{id}", delete(albums::delete_track))
        .route("/uploads/{id}", get(uploads::get_upload))
        .route("/uploads/{id}/file", get(uploads::download_upload));

    let app = Router::new()
        .nest(constants::API_PREFIX, api)
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .with_state(state)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(DefaultBodyLimit::max(
            config.max_upload_size_bytes() + UPLOAD_OVERHEAD_BYTES,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &ArchiveConfig) -> Result<CorsLayer, anyhow::Error> {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid CORS origin")?;
        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}
