//! Application state shared by all handlers.

use mediateca_core::ArchiveConfig;
use mediateca_db::{UploadRepository, VttTrackRepository};
use mediateca_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Limits and allowlists for a single upload kind.
#[derive(Clone, Debug)]
pub struct MediaLimits {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

pub struct AppState {
    pub pool: PgPool,
    pub config: ArchiveConfig,
    pub storage: Arc<dyn Storage>,
    pub uploads: UploadRepository,
    pub vtt_tracks: VttTrackRepository,
    pub text_limits: MediaLimits,
    pub video_limits: MediaLimits,
    pub audio_limits: MediaLimits,
    pub vtt_limits: MediaLimits,
}

impl AppState {
    pub fn limits(config: &ArchiveConfig) -> (MediaLimits, MediaLimits, MediaLimits, MediaLimits) {
        (
            MediaLimits {
                max_file_size: config.max_text_size_bytes,
                allowed_extensions: config.text_allowed_extensions.clone(),
                allowed_content_types: config.text_allowed_content_types.clone(),
            },
            MediaLimits {
                max_file_size: config.max_video_size_bytes,
                allowed_extensions: config.video_allowed_extensions.clone(),
                allowed_content_types: config.video_allowed_content_types.clone(),
            },
            MediaLimits {
                max_file_size: config.max_audio_size_bytes,
                allowed_extensions: config.audio_allowed_extensions.clone(),
                allowed_content_types: config.audio_allowed_content_types.clone(),
            },
            MediaLimits {
                max_file_size: config.max_vtt_size_bytes,
                allowed_extensions: config.vtt_allowed_extensions.clone(),
                allowed_content_types: config.vtt_allowed_content_types.clone(),
            },
        )
    }
}
