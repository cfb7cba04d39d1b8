use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::{validate_file, UploadParts};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mediateca_core::models::VttTrackResponse;
use mediateca_core::validation::FileFormat;
use mediateca_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v0/videos/{id}/vtt-tracks",
    tag = "videos",
    responses(
        (status = 200, description = "VTT track attached to the video", body = VttTrackResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn upload_vtt_track(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<VttTrackResponse>, HttpAppError> {
    let parts = UploadParts::read(multipart).await?;
    let kind = parts.vtt_kind()?;
    let file = parts.into_file()?;
    validate_file(&file, &state.vtt_limits, FileFormat::WebVtt)?;

    let track = state
        .vtt_tracks
        .create(video_id, kind, file.filename, file.content_type, file.data)
        .await?;

    tracing::info!(id = %track.id, video_id = %video_id, kind = %track.kind, "VTT track created");
    Ok(Json(VttTrackResponse::from(track)))
}

#[utoipa::path(
    get,
    path = "/api/v0/videos/{id}/vtt-tracks",
    tag = "videos",
    responses(
        (status = 200, description = "VTT tracks of the video", body = [VttTrackResponse]),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn list_vtt_tracks(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
) -> Result<Json<Vec<VttTrackResponse>>, HttpAppError> {
    if state.uploads.get_video(video_id).await?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()).into());
    }
    let tracks = state.vtt_tracks.list_for_video(video_id).await?;
    Ok(Json(tracks.into_iter().map(VttTrackResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/api/v0/vtt-tracks/{id}",
    tag = "videos",
    responses(
        (status = 204, description = "VTT track deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_vtt_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if !state.vtt_tracks.delete(id).await? {
        return Err(AppError::NotFound("VTT track not found".to_string()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
