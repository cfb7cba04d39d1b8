use chrono::Utc;
use mediateca_core::models::{UploadKind, VttKind, VttTrack, VttTrackRow};
use mediateca_core::AppError;
use mediateca_storage::{PathConfig, Storage};
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

/// Repository for the video_vtt_tracks table.
///
/// VTT tracks hang off a video and are cascade-deleted with it at the
/// database level; their files are not swept on delete.
#[derive(Clone)]
pub struct VttTrackRepository {
    pool: PgPool,
    storage: Arc<dyn Storage>,
    paths: PathConfig,
}

impl VttTrackRepository {
    pub fn new(pool: PgPool, storage: Arc<dyn Storage>, paths: PathConfig) -> Self {
        Self {
            pool,
            storage,
            paths,
        }
    }

    #[tracing::instrument(
        skip(self, data),
        fields(db.table = "video_vtt_tracks", db.operation = "insert", video_id = %video_id)
    )]
    pub async fn create(
        &self,
        video_id: Uuid,
        kind: VttKind,
        original_filename: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<VttTrack, AppError> {
        let video_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM uploads WHERE id = $1 AND kind = $2")
                .bind(video_id)
                .bind(UploadKind::Video)
                .fetch_optional(&self.pool)
                .await?;
        if video_exists.is_none() {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let proposed = self.paths.vtt_key(&original_filename);
        let key = self
            .storage
            .available_key(&proposed)
            .await
            .map_err(|e| AppError::Storage(format!("Key resolution failed: {}", e)))?;
        let url = self
            .storage
            .put(&key, &data)
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {}", e)))?;
        let filename = key.rsplit('/').next().unwrap_or(&key).to_string();

        let id = Uuid::new_v4();
        let now = Utc::now();

        let result = sqlx::query_as::<Postgres, VttTrackRow>(
            r#"
            INSERT INTO video_vtt_tracks (
                id, video_id, kind,
                filename, original_filename, content_type, storage_key, storage_url,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(video_id)
        .bind(kind)
        .bind(&filename)
        .bind(&original_filename)
        .bind(&content_type)
        .bind(&key)
        .bind(&url)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(VttTrack::from(row)),
            Err(e) => {
                if let Err(cleanup_err) = self.storage.delete(&key).await {
                    tracing::warn!(
                        error = %cleanup_err,
                        storage_key = %key,
                        "Failed to discard stored file after insert error"
                    );
                }
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "video_vtt_tracks", db.operation = "select", db.record_id = %id)
    )]
    pub async fn get(&self, id: Uuid) -> Result<Option<VttTrack>, AppError> {
        let row: Option<VttTrackRow> =
            sqlx::query_as("SELECT * FROM video_vtt_tracks WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(VttTrack::from))
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "video_vtt_tracks", db.operation = "select", video_id = %video_id)
    )]
    pub async fn list_for_video(&self, video_id: Uuid) -> Result<Vec<VttTrack>, AppError> {
        let rows: Vec<VttTrackRow> = sqlx::query_as(
            "SELECT * FROM video_vtt_tracks WHERE video_id = $1 ORDER BY created_at ASC",
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(VttTrack::from).collect())
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "video_vtt_tracks", db.operation = "delete", db.record_id = %id)
    )]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM video_vtt_tracks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
