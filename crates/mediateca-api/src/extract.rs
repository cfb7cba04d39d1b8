//! Multipart upload extraction and validation
//!
//! Upload requests carry the shared metadata (`title`, `identifier`,
//! optional `form`) as text parts, kind-specific fields (`text_type`,
//! `kind`), and the payload as a `file` part.

use axum::extract::Multipart;
use mediateca_core::models::{TextCategory, UploadForm, VttKind};
use mediateca_core::validation::{validate_upload, FileFormat};
use mediateca_core::AppError;
use std::collections::HashMap;
use validator::Validate;

use crate::error::HttpAppError;
use crate::state::MediaLimits;

/// The `file` part of an upload request.
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Shared metadata fields of an upload request.
#[derive(Debug, Validate)]
pub struct UploadMetadata {
    #[validate(length(min = 1, max = 1024))]
    pub title: String,
    #[validate(length(min = 1, max = 512))]
    pub identifier: String,
    pub form: UploadForm,
}

/// Collected multipart request: text fields plus at most one file part.
pub struct UploadParts {
    fields: HashMap<String, String>,
    file: Option<FilePart>,
}

impl UploadParts {
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut fields = HashMap::new();
        let mut file = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            HttpAppError(AppError::BadRequest(format!(
                "Invalid multipart body: {}",
                e
            )))
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "file" {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    HttpAppError(AppError::InvalidInput(
                        "File part must carry a filename".to_string(),
                    ))
                })?;
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        HttpAppError(AppError::BadRequest(format!(
                            "Failed to read file part: {}",
                            e
                        )))
                    })?
                    .to_vec();
                file = Some(FilePart {
                    filename,
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await.map_err(|e| {
                    HttpAppError(AppError::BadRequest(format!(
                        "Failed to read field '{}': {}",
                        name, e
                    )))
                })?;
                fields.insert(name, value);
            }
        }

        Ok(UploadParts { fields, file })
    }

    fn require_field(&self, name: &str) -> Result<&str, HttpAppError> {
        self.fields.get(name).map(String::as_str).ok_or_else(|| {
            HttpAppError(AppError::InvalidInput(format!(
                "Missing required field '{}'",
                name
            )))
        })
    }

    /// Shared metadata: `title` and `identifier` are required, `form`
    /// defaults to digitized.
    pub fn metadata(&self) -> Result<UploadMetadata, HttpAppError> {
        let form = match self.fields.get("form") {
            Some(raw) => raw
                .parse::<UploadForm>()
                .map_err(|e| HttpAppError(AppError::InvalidInput(e)))?,
            None => UploadForm::default(),
        };
        let metadata = UploadMetadata {
            title: self.require_field("title")?.to_string(),
            identifier: self.require_field("identifier")?.to_string(),
            form,
        };
        metadata
            .validate()
            .map_err(|e| HttpAppError(AppError::from(e)))?;
        Ok(metadata)
    }

    /// `text_type` field for text uploads; defaults to article.
    pub fn text_category(&self) -> Result<TextCategory, HttpAppError> {
        match self.fields.get("text_type") {
            Some(raw) => raw
                .parse::<TextCategory>()
                .map_err(|e| HttpAppError(AppError::InvalidInput(e))),
            None => Ok(TextCategory::Article),
        }
    }

    /// `kind` field for VTT track uploads; required.
    pub fn vtt_kind(&self) -> Result<VttKind, HttpAppError> {
        self.require_field("kind")?
            .parse::<VttKind>()
            .map_err(|e| HttpAppError(AppError::InvalidInput(e)))
    }

    /// Consume the parts and hand back the file.
    pub fn into_file(self) -> Result<FilePart, HttpAppError> {
        self.file.ok_or_else(|| {
            HttpAppError(AppError::InvalidInput(
                "Missing required file part 'file'".to_string(),
            ))
        })
    }
}

/// Validate a file part against the limits for its kind and the expected
/// on-disk format.
pub fn validate_file(
    file: &FilePart,
    limits: &MediaLimits,
    format: FileFormat,
) -> Result<(), HttpAppError> {
    validate_upload(
        &file.filename,
        &file.content_type,
        &file.data,
        limits.max_file_size,
        &limits.allowed_extensions,
        &limits.allowed_content_types,
        format,
    )
    .map_err(HttpAppError::from)
}
