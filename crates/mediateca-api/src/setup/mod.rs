//! Application setup: database, storage, routes, server.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use mediateca_core::ArchiveConfig;
use mediateca_db::{UploadRepository, VttTrackRepository};
use mediateca_storage::PathConfig;
use std::sync::Arc;

/// Build the application state and router from configuration.
pub async fn initialize_app(config: ArchiveConfig) -> Result<(Arc<AppState>, Router)> {
    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let paths = PathConfig::from_archive_config(&config);
    let uploads = UploadRepository::new(pool.clone(), storage.clone(), paths.clone());
    let vtt_tracks = VttTrackRepository::new(pool.clone(), storage.clone(), paths);

    let (text_limits, video_limits, audio_limits, vtt_limits) = AppState::limits(&config);

    let state = Arc::new(AppState {
        pool,
        config: config.clone(),
        storage,
        uploads,
        vtt_tracks,
        text_limits,
        video_limits,
        audio_limits,
        vtt_limits,
    });

    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
