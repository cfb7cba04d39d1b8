use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::extract::{validate_file, UploadParts};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mediateca_core::models::{TextCategory, TextResponse, UploadForm};
use mediateca_core::validation::FileFormat;
use mediateca_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

fn text_response(state: &AppState, text: mediateca_core::models::Text) -> TextResponse {
    TextResponse::new(text, &state.config.texts_endpoint, &state.config.text_subdir)
}

#[utoipa::path(
    post,
    path = "/api/v0/texts",
    tag = "texts",
    responses(
        (status = 200, description = "Text uploaded successfully", body = TextResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_text(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, HttpAppError> {
    let parts = UploadParts::read(multipart).await?;
    let metadata = parts.metadata()?;
    let category = parts.text_category()?;
    let file = parts.into_file()?;
    validate_file(&file, &state.text_limits, FileFormat::Pdf)?;

    let text = state
        .uploads
        .create_text(
            metadata.title,
            metadata.identifier,
            metadata.form,
            category,
            file.filename,
            file.content_type,
            file.data,
        )
        .await?;

    tracing::info!(id = %text.id, category = %text.category, "Text upload created");
    Ok(Json(text_response(&state, text)))
}

#[utoipa::path(
    get,
    path = "/api/v0/texts",
    tag = "texts",
    responses((status = 200, description = "All text uploads", body = [TextResponse]))
)]
pub async fn list_texts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TextResponse>>, HttpAppError> {
    let texts = state.uploads.list_texts().await?;
    Ok(Json(
        texts
            .into_iter()
            .map(|t| text_response(&state, t))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v0/texts/{id}",
    tag = "texts",
    responses(
        (status = 200, description = "Text upload", body = TextResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TextResponse>, HttpAppError> {
    let text = state
        .uploads
        .get_text(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Text upload not found".to_string()))?;
    Ok(Json(text_response(&state, text)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTextRequest {
    #[validate(length(min = 1, max = 1024))]
    pub title: String,
    #[validate(length(min = 1, max = 512))]
    pub identifier: String,
    pub form: Option<UploadForm>,
    /// The category cannot be changed after creation; sending a different
    /// value is rejected.
    pub category: Option<TextCategory>,
}

#[utoipa::path(
    patch,
    path = "/api/v0/texts/{id}",
    tag = "texts",
    request_body = UpdateTextRequest,
    responses(
        (status = 200, description = "Text upload updated", body = TextResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTextRequest>,
) -> Result<Json<TextResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let text = state
        .uploads
        .update_text(id, request.title, request.identifier, request.form, request.category)
        .await?;
    Ok(Json(text_response(&state, text)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/texts/{id}",
    tag = "texts",
    responses(
        (status = 204, description = "Text upload deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if state.uploads.get_text(id).await?.is_none() {
        return Err(AppError::NotFound("Text upload not found".to_string()).into());
    }
    state.uploads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
