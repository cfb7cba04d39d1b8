use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::{validate_file, UploadParts};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mediateca_core::models::VideoResponse;
use mediateca_core::validation::FileFormat;
use mediateca_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v0/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Video uploaded successfully", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let parts = UploadParts::read(multipart).await?;
    let metadata = parts.metadata()?;
    let file = parts.into_file()?;
    validate_file(&file, &state.video_limits, FileFormat::Mp4)?;

    let video = state
        .uploads
        .create_video(
            metadata.title,
            metadata.identifier,
            metadata.form,
            file.filename,
            file.content_type,
            file.data,
        )
        .await?;

    tracing::info!(id = %video.id, "Video upload created");
    Ok(Json(VideoResponse::new(video, &state.config.base_url)))
}

#[utoipa::path(
    get,
    path = "/api/v0/videos",
    tag = "videos",
    responses((status = 200, description = "All video uploads", body = [VideoResponse]))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.uploads.list_videos().await?;
    Ok(Json(
        videos
            .into_iter()
            .map(|v| VideoResponse::new(v, &state.config.base_url))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    responses(
        (status = 200, description = "Video upload", body = VideoResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = state
        .uploads
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    Ok(Json(VideoResponse::new(video, &state.config.base_url)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    responses(
        (status = 204, description = "Video deleted; attached VTT tracks go with it"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if state.uploads.get_video(id).await?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()).into());
    }
    state.uploads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
