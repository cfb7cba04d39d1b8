use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::extract::{validate_file, UploadParts};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mediateca_core::models::{AudioAlbumResponse, AudioTrackResponse, UploadForm};
use mediateca_core::validation::FileFormat;
use mediateca_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlbumRequest {
    #[validate(length(min = 1, max = 1024))]
    pub title: String,
    #[validate(length(min = 1, max = 512))]
    pub identifier: String,
    pub form: Option<UploadForm>,
}

#[utoipa::path(
    post,
    path = "/api/v0/audio-albums",
    tag = "audio-albums",
    request_body = CreateAlbumRequest,
    responses(
        (status = 200, description = "Album created", body = AudioAlbumResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_album(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateAlbumRequest>,
) -> Result<Json<AudioAlbumResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let album = state
        .uploads
        .create_album(
            request.title,
            request.identifier,
            request.form.unwrap_or_default(),
        )
        .await?;

    tracing::info!(id = %album.id, "Audio album created");
    Ok(Json(AudioAlbumResponse::new(
        album,
        Vec::new(),
        &state.config.base_url,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v0/audio-albums",
    tag = "audio-albums",
    responses((status = 200, description = "All audio albums", body = [AudioAlbumResponse]))
)]
pub async fn list_albums(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AudioAlbumResponse>>, HttpAppError> {
    let albums = state.uploads.list_albums().await?;
    let mut responses = Vec::with_capacity(albums.len());
    for album in albums {
        let tracks = state.uploads.list_tracks(album.id).await?;
        responses.push(AudioAlbumResponse::new(album, tracks, &state.config.base_url));
    }
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/v0/audio-albums/{id}",
    tag = "audio-albums",
    responses(
        (status = 200, description = "Album with its tracks", body = AudioAlbumResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_album(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AudioAlbumResponse>, HttpAppError> {
    let album = state
        .uploads
        .get_album(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Audio album not found".to_string()))?;
    let tracks = state.uploads.list_tracks(album.id).await?;
    Ok(Json(AudioAlbumResponse::new(
        album,
        tracks,
        &state.config.base_url,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v0/audio-albums/{id}",
    tag = "audio-albums",
    responses(
        (status = 204, description = "Album deleted; its tracks are cascade-deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_album(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if state.uploads.get_album(id).await?.is_none() {
        return Err(AppError::NotFound("Audio album not found".to_string()).into());
    }
    state.uploads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v0/audio-albums/{id}/tracks",
    tag = "audio-albums",
    responses(
        (status = 200, description = "Track uploaded into the album", body = AudioTrackResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse)
    )
)]
pub async fn upload_track(
    State(state): State<Arc<AppState>>,
    Path(album_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AudioTrackResponse>, HttpAppError> {
    let parts = UploadParts::read(multipart).await?;
    let metadata = parts.metadata()?;
    let file = parts.into_file()?;
    validate_file(&file, &state.audio_limits, FileFormat::Mp3)?;

    let track = state
        .uploads
        .create_track(
            album_id,
            metadata.title,
            metadata.identifier,
            metadata.form,
            file.filename,
            file.content_type,
            file.data,
        )
        .await?;

    tracing::info!(id = %track.id, album_id = %album_id, "Audio track created");
    Ok(Json(AudioTrackResponse::from(track)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/tracks/{id}",
    tag = "audio-albums",
    responses(
        (status = 204, description = "Track deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if state.uploads.get_track(id).await?.is_none() {
        return Err(AppError::NotFound("Audio track not found".to_string()).into());
    }
    state.uploads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
