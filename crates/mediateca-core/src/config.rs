//! Configuration module
//!
//! Archive configuration loaded from the environment: database, storage
//! paths, public endpoints, and per-kind upload limits.

use std::env;

const SERVER_PORT: u16 = 3000;
const DB_MAX_CONNECTIONS: u32 = 20;
const DB_TIMEOUT_SECS: u64 = 30;
const MAX_TEXT_SIZE_MB: usize = 50;
const MAX_VIDEO_SIZE_MB: usize = 500;
const MAX_AUDIO_SIZE_MB: usize = 100;
const MAX_VTT_SIZE_MB: usize = 5;

/// Archive service configuration.
///
/// The subdirectory settings control where uploads land under the storage
/// root: text uploads under `text_subdir` (split further by category), video
/// and audio under `av_subdir`, VTT tracks under `vtt_subdir`.
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Storage configuration
    pub storage_root: String,
    pub media_base_url: String,
    pub text_subdir: String,
    pub av_subdir: String,
    pub vtt_subdir: String,
    // Public endpoints used when building content URLs
    pub base_url: String,
    pub texts_endpoint: String,
    // Upload limits
    pub max_text_size_bytes: usize,
    pub text_allowed_extensions: Vec<String>,
    pub text_allowed_content_types: Vec<String>,
    pub max_video_size_bytes: usize,
    pub video_allowed_extensions: Vec<String>,
    pub video_allowed_content_types: Vec<String>,
    pub max_audio_size_bytes: usize,
    pub audio_allowed_extensions: Vec<String>,
    pub audio_allowed_content_types: Vec<String>,
    pub max_vtt_size_bytes: usize,
    pub vtt_allowed_extensions: Vec<String>,
    pub vtt_allowed_content_types: Vec<String>,
}

impl ArchiveConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production = is_production_env(&environment);
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let texts_endpoint =
            env::var("TEXTS_ENDPOINT").unwrap_or_else(|_| format!("{}/texts/", base_url));

        Ok(ArchiveConfig {
            server_port: env_parsed("SERVER_PORT", SERVER_PORT),
            environment,
            cors_origins: env_list("CORS_ORIGINS", "*"),
            database_url,
            db_max_connections: env_parsed("DB_MAX_CONNECTIONS", DB_MAX_CONNECTIONS),
            db_timeout_seconds: env_parsed("DB_TIMEOUT_SECONDS", DB_TIMEOUT_SECS),
            storage_root: env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "/var/lib/mediateca/media".to_string()),
            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| format!("{}/media", base_url)),
            text_subdir: env::var("TEXT_SUBDIR").unwrap_or_else(|_| "texts/".to_string()),
            av_subdir: env::var("AV_SUBDIR").unwrap_or_else(|_| "av/".to_string()),
            vtt_subdir: env::var("VTT_SUBDIR").unwrap_or_else(|_| "text/vtt/".to_string()),
            base_url,
            texts_endpoint,
            max_text_size_bytes: env_parsed("MAX_TEXT_SIZE_MB", MAX_TEXT_SIZE_MB) * 1024 * 1024,
            text_allowed_extensions: env_list("TEXT_ALLOWED_EXTENSIONS", "pdf"),
            text_allowed_content_types: env_list(
                "TEXT_ALLOWED_CONTENT_TYPES",
                "application/pdf",
            ),
            max_video_size_bytes: env_parsed("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB) * 1024 * 1024,
            video_allowed_extensions: env_list("VIDEO_ALLOWED_EXTENSIONS", "mp4"),
            video_allowed_content_types: env_list("VIDEO_ALLOWED_CONTENT_TYPES", "video/mp4"),
            max_audio_size_bytes: env_parsed("MAX_AUDIO_SIZE_MB", MAX_AUDIO_SIZE_MB) * 1024 * 1024,
            audio_allowed_extensions: env_list("AUDIO_ALLOWED_EXTENSIONS", "mp3"),
            audio_allowed_content_types: env_list(
                "AUDIO_ALLOWED_CONTENT_TYPES",
                "audio/mpeg,audio/mp3",
            ),
            max_vtt_size_bytes: env_parsed("MAX_VTT_SIZE_MB", MAX_VTT_SIZE_MB) * 1024 * 1024,
            vtt_allowed_extensions: env_list("VTT_ALLOWED_EXTENSIONS", "vtt"),
            vtt_allowed_content_types: env_list("VTT_ALLOWED_CONTENT_TYPES", "text/vtt"),
        })
    }

    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    /// Largest configured upload ceiling, used for the request body limit.
    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_text_size_bytes
            .max(self.max_video_size_bytes)
            .max(self.max_audio_size_bytes)
            .max(self.max_vtt_size_bytes)
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
