//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement, so the repositories can work with any backend without coupling
//! to implementation details.

use async_trait::async_trait;
use thiserror::Error;

use crate::paths::split_key_extension;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Storage abstraction trait
///
/// Keys are slash-separated paths relative to the storage root; the path
/// policy in [`crate::paths`] produces them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a file under the given key and return its public URL.
    async fn put(&self, storage_key: &str, data: &[u8]) -> StorageResult<String>;

    /// Read a file by its storage key.
    async fn read(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Deleting a missing file is a no-op.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Size in bytes of the stored file.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Public URL for a storage key.
    fn url_for(&self, storage_key: &str) -> String;

    /// Get the storage backend type.
    fn backend_type(&self) -> StorageBackend;

    /// Resolve a proposed key to one that is free, appending `-1`, `-2`, ...
    /// before the extension until an unused key is found. Deterministic for a
    /// given set of existing files.
    async fn available_key(&self, proposed: &str) -> StorageResult<String> {
        if !self.exists(proposed).await? {
            return Ok(proposed.to_string());
        }
        let (stem, extension) = split_key_extension(proposed);
        let mut n: u32 = 1;
        loop {
            let candidate = match extension {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            if !self.exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
