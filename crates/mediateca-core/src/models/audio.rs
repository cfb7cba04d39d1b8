use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::upload::{StoredFile, UploadForm};

/// Standalone audio upload (mp3). Album tracks are a separate kind.
#[derive(Debug, Clone, Serialize)]
pub struct Audio {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub file: StoredFile,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audio {
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/audio/{}", base_url.trim_end_matches('/'), self.id)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AudioResponse {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub filename: String,
    pub url: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AudioResponse {
    pub fn new(audio: Audio, base_url: &str) -> Self {
        let url = audio.public_url(base_url);
        AudioResponse {
            id: audio.id,
            title: audio.title,
            identifier: audio.identifier,
            form: audio.form,
            filename: audio.file.original_filename,
            url,
            content_type: audio.file.content_type,
            file_size: audio.file_size,
            created_at: audio.created_at,
            updated_at: audio.updated_at,
        }
    }
}
