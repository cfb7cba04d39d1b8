use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::upload::{StoredFile, UploadForm};

/// Video upload (mp4).
#[derive(Debug, Clone, Serialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub file: StoredFile,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/videos/{}", base_url.trim_end_matches('/'), self.id)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
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

impl VideoResponse {
    pub fn new(video: Video, base_url: &str) -> Self {
        let url = video.public_url(base_url);
        VideoResponse {
            id: video.id,
            title: video.title,
            identifier: video.identifier,
            form: video.form,
            filename: video.file.original_filename,
            url,
            content_type: video.file.content_type,
            file_size: video.file_size,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_is_id_based() {
        let video = Video {
            id: Uuid::new_v4(),
            title: "Oral history interview".to_string(),
            identifier: "vhs-0042".to_string(),
            form: UploadForm::Digitized,
            file: StoredFile {
                filename: "interview.mp4".to_string(),
                original_filename: "interview.mp4".to_string(),
                content_type: "video/mp4".to_string(),
                key: "av/video/interview.mp4".to_string(),
                url: "http://localhost:3000/media/av/video/interview.mp4".to_string(),
            },
            file_size: Some(10_240_000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            video.public_url("http://localhost:3000/"),
            format!("http://localhost:3000/videos/{}", video.id)
        );
    }
}
