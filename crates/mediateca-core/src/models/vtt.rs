use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::upload::StoredFile;

/// WebVTT track kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "vtt_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum VttKind {
    /// For hearing impairment
    Captions,
    /// For language translations
    Subtitles,
    /// For vision impairment
    Descriptions,
}

impl Display for VttKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VttKind::Captions => write!(f, "captions"),
            VttKind::Subtitles => write!(f, "subtitles"),
            VttKind::Descriptions => write!(f, "descriptions"),
        }
    }
}

impl std::str::FromStr for VttKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "captions" => Ok(VttKind::Captions),
            "subtitles" => Ok(VttKind::Subtitles),
            "descriptions" => Ok(VttKind::Descriptions),
            unknown => Err(format!("Unknown VTT track kind '{}'", unknown)),
        }
    }
}

/// Database row for the video_vtt_tracks table. Unlike uploads rows, every
/// column is non-null: a VTT track always has a file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct VttTrackRow {
    pub id: Uuid,
    pub video_id: Uuid,
    pub kind: VttKind,
    pub filename: String,
    pub original_filename: String,
    pub content_type: String,
    pub storage_key: String,
    pub storage_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// VTT track attached to a video.
#[derive(Debug, Clone, Serialize)]
pub struct VttTrack {
    pub id: Uuid,
    pub video_id: Uuid,
    pub kind: VttKind,
    pub file: StoredFile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VttTrackRow> for VttTrack {
    fn from(row: VttTrackRow) -> Self {
        VttTrack {
            id: row.id,
            video_id: row.video_id,
            kind: row.kind,
            file: StoredFile {
                filename: row.filename,
                original_filename: row.original_filename,
                content_type: row.content_type,
                key: row.storage_key,
                url: row.storage_url,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VttTrackResponse {
    pub id: Uuid,
    pub video_id: Uuid,
    pub kind: VttKind,
    pub filename: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VttTrack> for VttTrackResponse {
    fn from(track: VttTrack) -> Self {
        VttTrackResponse {
            id: track.id,
            video_id: track.video_id,
            kind: track.kind,
            filename: track.file.original_filename,
            url: track.file.url,
            created_at: track.created_at,
            updated_at: track.updated_at,
        }
    }
}
