//! Storage backends for mediateca
//!
//! The [`Storage`](traits::Storage) trait is the seam between the
//! repositories and the place files actually live; [`LocalStorage`](local)
//! is the filesystem backend. [`paths`] holds the upload path policy:
//! filename sanitization and the category-to-subdirectory mapping for texts.

pub mod local;
pub mod paths;
pub mod traits;

pub use local::LocalStorage;
pub use paths::PathConfig;
pub use traits::{Storage, StorageBackend, StorageError, StorageResult};
