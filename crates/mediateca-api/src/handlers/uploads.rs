//! Polymorphic upload endpoints: kind-agnostic read and file download.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mediateca_core::models::{
    AudioAlbumResponse, AudioResponse, AudioTrackResponse, TextResponse, Upload, VideoResponse,
};
use mediateca_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Response for the polymorphic read: the concrete subtype decides the shape.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadResponse {
    Text(TextResponse),
    Video(VideoResponse),
    Audio(AudioResponse),
    AudioAlbum(AudioAlbumResponse),
    AudioTrack(AudioTrackResponse),
}

#[utoipa::path(
    get,
    path = "/api/v0/uploads/{id}",
    tag = "uploads",
    responses(
        (status = 200, description = "Upload of any kind", body = UploadResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let upload = state
        .uploads
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?;

    let config = &state.config;
    let response = match upload {
        Upload::Text(text) => UploadResponse::Text(TextResponse::new(
            text,
            &config.texts_endpoint,
            &config.text_subdir,
        )),
        Upload::Video(video) => {
            UploadResponse::Video(VideoResponse::new(video, &config.base_url))
        }
        Upload::Audio(audio) => {
            UploadResponse::Audio(AudioResponse::new(audio, &config.base_url))
        }
        Upload::AudioAlbum(album) => {
            let tracks = state.uploads.list_tracks(album.id).await?;
            UploadResponse::AudioAlbum(AudioAlbumResponse::new(album, tracks, &config.base_url))
        }
        Upload::AudioTrack(track) => UploadResponse::AudioTrack(AudioTrackResponse::from(track)),
    };

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v0/uploads/{id}/file",
    tag = "uploads",
    responses(
        (status = 200, description = "Raw file bytes"),
        (status = 400, description = "Upload has no file", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn download_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let upload = state
        .uploads
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?;

    let file = upload
        .file()
        .ok_or_else(|| AppError::BadRequest("Audio albums have no file".to_string()))?
        .clone();

    let data = state.storage.read(&file.key).await.map_err(HttpAppError::from)?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, data).into_response())
}
