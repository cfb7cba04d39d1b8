//! Storage backend setup

use anyhow::Result;
use mediateca_core::ArchiveConfig;
use mediateca_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Build the storage backend from configuration.
pub async fn setup_storage(config: &ArchiveConfig) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(
        config.storage_root.clone(),
        config.media_base_url.clone(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to initialize local storage: {}", e))?;

    tracing::info!(
        root = %config.storage_root,
        base_url = %config.media_base_url,
        "Local storage ready"
    );

    Ok(Arc::new(storage))
}
