//! Database repositories for mediateca
//!
//! Repositories own the storage interaction around persistence: size capture
//! happens just before a file-backed row is inserted, and file cleanup runs
//! just after a row is deleted.

mod db;

pub use db::uploads::UploadRepository;
pub use db::vtt::VttTrackRepository;
