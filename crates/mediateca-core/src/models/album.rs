use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::upload::{StoredFile, UploadForm};

/// Audio album: a container upload with no file of its own. Tracks reference
/// it and are cascade-deleted with it.
#[derive(Debug, Clone, Serialize)]
pub struct AudioAlbum {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AudioAlbum {
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/audio-albums/{}", base_url.trim_end_matches('/'), self.id)
    }
}

/// Audio track belonging to an album (mp3).
#[derive(Debug, Clone, Serialize)]
pub struct AudioTrack {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub album_id: Uuid,
    pub file: StoredFile,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AudioTrackResponse {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub album_id: Uuid,
    pub filename: String,
    pub url: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AudioTrack> for AudioTrackResponse {
    fn from(track: AudioTrack) -> Self {
        AudioTrackResponse {
            id: track.id,
            title: track.title,
            identifier: track.identifier,
            form: track.form,
            album_id: track.album_id,
            filename: track.file.original_filename,
            url: track.file.url,
            content_type: track.file.content_type,
            file_size: track.file_size,
            created_at: track.created_at,
            updated_at: track.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AudioAlbumResponse {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub url: String,
    pub tracks: Vec<AudioTrackResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AudioAlbumResponse {
    pub fn new(album: AudioAlbum, tracks: Vec<AudioTrack>, base_url: &str) -> Self {
        let url = album.public_url(base_url);
        AudioAlbumResponse {
            id: album.id,
            title: album.title,
            identifier: album.identifier,
            form: album.form,
            url,
            tracks: tracks.into_iter().map(AudioTrackResponse::from).collect(),
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}
