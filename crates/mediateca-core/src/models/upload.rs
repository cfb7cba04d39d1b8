use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::album::{AudioAlbum, AudioTrack};
use super::audio::Audio;
use super::text::{Text, TextCategory};
use super::video::Video;
use crate::error::AppError;

/// Upload kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "upload_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    Text,
    Video,
    Audio,
    AudioAlbum,
    AudioTrack,
}

impl Display for UploadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadKind::Text => write!(f, "text"),
            UploadKind::Video => write!(f, "video"),
            UploadKind::Audio => write!(f, "audio"),
            UploadKind::AudioAlbum => write!(f, "audio_album"),
            UploadKind::AudioTrack => write!(f, "audio_track"),
        }
    }
}

/// How the content entered the collection: scanned/ripped from a physical
/// carrier, or born digital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "upload_form", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UploadForm {
    #[default]
    Digitized,
    BornDigital,
}

impl Display for UploadForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadForm::Digitized => write!(f, "digitized"),
            UploadForm::BornDigital => write!(f, "born_digital"),
        }
    }
}

impl std::str::FromStr for UploadForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digitized" => Ok(UploadForm::Digitized),
            "born_digital" => Ok(UploadForm::BornDigital),
            other => Err(format!("Unknown upload form '{}'", other)),
        }
    }
}

/// File attachment of a file-backed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Filename as stored (after sanitization and collision dedup)
    pub filename: String,
    /// Filename as submitted by the client
    pub original_filename: String,
    pub content_type: String,
    /// Storage key relative to the storage root
    pub key: String,
    /// Public URL of the stored file
    pub url: String,
}

impl StoredFile {
    /// Final path segment of the stored file.
    pub fn name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Database row for the uploads table.
///
/// File columns are nullable because `audio_album` rows have no file;
/// `text_category` is set only for texts and `album_id` only for tracks.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct UploadRow {
    pub id: Uuid,
    pub kind: UploadKind,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub filename: Option<String>,
    pub original_filename: Option<String>,
    pub content_type: Option<String>,
    pub storage_key: Option<String>,
    pub storage_url: Option<String>,
    pub file_size: Option<i64>,
    pub text_category: Option<TextCategory>,
    pub album_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadRow {
    /// File attachment of this row, if it has one.
    fn stored_file(&self) -> Option<StoredFile> {
        Some(StoredFile {
            filename: self.filename.clone()?,
            original_filename: self.original_filename.clone()?,
            content_type: self.content_type.clone()?,
            key: self.storage_key.clone()?,
            url: self.storage_url.clone()?,
        })
    }

    fn require_file(&self) -> Result<StoredFile, AppError> {
        self.stored_file().ok_or_else(|| {
            AppError::Internal(format!(
                "Upload {} ({}) has no file columns",
                self.id, self.kind
            ))
        })
    }
}

/// Polymorphic upload enum; the concrete subtype is resolved at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Upload {
    Text(Text),
    Video(Video),
    Audio(Audio),
    AudioAlbum(AudioAlbum),
    AudioTrack(AudioTrack),
}

impl Upload {
    pub fn id(&self) -> Uuid {
        match self {
            Upload::Text(t) => t.id,
            Upload::Video(v) => v.id,
            Upload::Audio(a) => a.id,
            Upload::AudioAlbum(a) => a.id,
            Upload::AudioTrack(t) => t.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Upload::Text(t) => &t.title,
            Upload::Video(v) => &v.title,
            Upload::Audio(a) => &a.title,
            Upload::AudioAlbum(a) => &a.title,
            Upload::AudioTrack(t) => &t.title,
        }
    }

    pub fn kind(&self) -> UploadKind {
        match self {
            Upload::Text(_) => UploadKind::Text,
            Upload::Video(_) => UploadKind::Video,
            Upload::Audio(_) => UploadKind::Audio,
            Upload::AudioAlbum(_) => UploadKind::AudioAlbum,
            Upload::AudioTrack(_) => UploadKind::AudioTrack,
        }
    }

    /// File attachment, `None` for albums.
    pub fn file(&self) -> Option<&StoredFile> {
        match self {
            Upload::Text(t) => Some(&t.file),
            Upload::Video(v) => Some(&v.file),
            Upload::Audio(a) => Some(&a.file),
            Upload::AudioAlbum(_) => None,
            Upload::AudioTrack(t) => Some(&t.file),
        }
    }

    /// Final path segment of the stored file, `None` for albums.
    pub fn name(&self) -> Option<&str> {
        self.file().map(StoredFile::name)
    }
}

/// Build Text from an uploads row.
pub fn to_text(row: &UploadRow) -> Result<Text, AppError> {
    Ok(Text {
        id: row.id,
        title: row.title.clone(),
        identifier: row.identifier.clone(),
        form: row.form,
        category: row.text_category.ok_or_else(|| {
            AppError::Internal(format!("Text upload {} has no category", row.id))
        })?,
        file: row.require_file()?,
        file_size: row.file_size,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Build Video from an uploads row.
pub fn to_video(row: &UploadRow) -> Result<Video, AppError> {
    Ok(Video {
        id: row.id,
        title: row.title.clone(),
        identifier: row.identifier.clone(),
        form: row.form,
        file: row.require_file()?,
        file_size: row.file_size,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Build Audio from an uploads row.
pub fn to_audio(row: &UploadRow) -> Result<Audio, AppError> {
    Ok(Audio {
        id: row.id,
        title: row.title.clone(),
        identifier: row.identifier.clone(),
        form: row.form,
        file: row.require_file()?,
        file_size: row.file_size,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Build AudioAlbum from an uploads row.
pub fn to_audio_album(row: &UploadRow) -> AudioAlbum {
    AudioAlbum {
        id: row.id,
        title: row.title.clone(),
        identifier: row.identifier.clone(),
        form: row.form,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Build AudioTrack from an uploads row.
pub fn to_audio_track(row: &UploadRow) -> Result<AudioTrack, AppError> {
    Ok(AudioTrack {
        id: row.id,
        title: row.title.clone(),
        identifier: row.identifier.clone(),
        form: row.form,
        album_id: row.album_id.ok_or_else(|| {
            AppError::Internal(format!("Audio track {} has no album", row.id))
        })?,
        file: row.require_file()?,
        file_size: row.file_size,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Build the polymorphic Upload enum from an uploads row.
pub fn to_upload(row: &UploadRow) -> Result<Upload, AppError> {
    Ok(match row.kind {
        UploadKind::Text => Upload::Text(to_text(row)?),
        UploadKind::Video => Upload::Video(to_video(row)?),
        UploadKind::Audio => Upload::Audio(to_audio(row)?),
        UploadKind::AudioAlbum => Upload::AudioAlbum(to_audio_album(row)),
        UploadKind::AudioTrack => Upload::AudioTrack(to_audio_track(row)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_row(kind: UploadKind) -> UploadRow {
        UploadRow {
            id: Uuid::new_v4(),
            kind,
            title: "Field recordings vol. 1".to_string(),
            identifier: "31197231668866".to_string(),
            form: UploadForm::Digitized,
            filename: Some("recordings.mp3".to_string()),
            original_filename: Some("recordings.mp3".to_string()),
            content_type: Some("audio/mpeg".to_string()),
            storage_key: Some("av/audio/recordings.mp3".to_string()),
            storage_url: Some("http://localhost:3000/media/av/audio/recordings.mp3".to_string()),
            file_size: Some(1_024),
            text_category: None,
            album_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_upload_kind_serde_snake_case() {
        let json = serde_json::to_string(&UploadKind::AudioAlbum).unwrap();
        assert_eq!(json, "\"audio_album\"");
        let kind: UploadKind = serde_json::from_str("\"audio_track\"").unwrap();
        assert_eq!(kind, UploadKind::AudioTrack);
    }

    #[test]
    fn test_upload_form_default_is_digitized() {
        assert_eq!(UploadForm::default(), UploadForm::Digitized);
    }

    #[test]
    fn test_stored_file_name_is_last_segment() {
        let file = StoredFile {
            filename: "recordings.mp3".to_string(),
            original_filename: "recordings.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            key: "av/audio/recordings.mp3".to_string(),
            url: "http://localhost:3000/media/av/audio/recordings.mp3".to_string(),
        };
        assert_eq!(file.name(), "recordings.mp3");
    }

    #[test]
    fn test_to_audio_builds_domain_model() {
        let row = file_row(UploadKind::Audio);
        let audio = to_audio(&row).unwrap();
        assert_eq!(audio.id, row.id);
        assert_eq!(audio.file.key, "av/audio/recordings.mp3");
        assert_eq!(audio.file_size, Some(1_024));
    }

    #[test]
    fn test_to_text_requires_category() {
        let mut row = file_row(UploadKind::Text);
        row.text_category = None;
        assert!(to_text(&row).is_err());
    }

    #[test]
    fn test_to_audio_track_requires_album() {
        let row = file_row(UploadKind::AudioTrack);
        assert!(to_audio_track(&row).is_err());

        let mut row = file_row(UploadKind::AudioTrack);
        row.album_id = Some(Uuid::new_v4());
        assert!(to_audio_track(&row).is_ok());
    }

    #[test]
    fn test_to_upload_resolves_subtype_from_kind() {
        let row = file_row(UploadKind::Audio);
        let upload = to_upload(&row).unwrap();
        assert_eq!(upload.kind(), UploadKind::Audio);
        assert_eq!(upload.name(), Some("recordings.mp3"));
    }

    #[test]
    fn test_album_row_without_file_is_valid() {
        let mut row = file_row(UploadKind::AudioAlbum);
        row.filename = None;
        row.original_filename = None;
        row.content_type = None;
        row.storage_key = None;
        row.storage_url = None;
        let upload = to_upload(&row).unwrap();
        assert_eq!(upload.kind(), UploadKind::AudioAlbum);
        assert_eq!(upload.name(), None);
    }
}
