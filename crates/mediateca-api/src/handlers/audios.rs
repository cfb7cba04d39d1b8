use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::{validate_file, UploadParts};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mediateca_core::models::AudioResponse;
use mediateca_core::validation::FileFormat;
use mediateca_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v0/audio",
    tag = "audio",
    responses(
        (status = 200, description = "Audio uploaded successfully", body = AudioResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AudioResponse>, HttpAppError> {
    let parts = UploadParts::read(multipart).await?;
    let metadata = parts.metadata()?;
    let file = parts.into_file()?;
    validate_file(&file, &state.audio_limits, FileFormat::Mp3)?;

    let audio = state
        .uploads
        .create_audio(
            metadata.title,
            metadata.identifier,
            metadata.form,
            file.filename,
            file.content_type,
            file.data,
        )
        .await?;

    tracing::info!(id = %audio.id, "Audio upload created");
    Ok(Json(AudioResponse::new(audio, &state.config.base_url)))
}

#[utoipa::path(
    get,
    path = "/api/v0/audio",
    tag = "audio",
    responses((status = 200, description = "All standalone audio uploads", body = [AudioResponse]))
)]
pub async fn list_audio(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AudioResponse>>, HttpAppError> {
    let audio = state.uploads.list_audio().await?;
    Ok(Json(
        audio
            .into_iter()
            .map(|a| AudioResponse::new(a, &state.config.base_url))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v0/audio/{id}",
    tag = "audio",
    responses(
        (status = 200, description = "Audio upload", body = AudioResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AudioResponse>, HttpAppError> {
    let audio = state
        .uploads
        .get_audio(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Audio not found".to_string()))?;
    Ok(Json(AudioResponse::new(audio, &state.config.base_url)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/audio/{id}",
    tag = "audio",
    responses(
        (status = 204, description = "Audio deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if state.uploads.get_audio(id).await?.is_none() {
        return Err(AppError::NotFound("Audio not found".to_string()).into());
    }
    state.uploads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
