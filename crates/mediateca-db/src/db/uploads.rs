use chrono::Utc;
use mediateca_core::models::{
    to_audio, to_audio_album, to_audio_track, to_text, to_upload, to_video, Audio, AudioAlbum,
    AudioTrack, Text, TextCategory, Upload, UploadForm, UploadKind, UploadRow, Video,
};
use mediateca_core::AppError;
use mediateca_storage::{PathConfig, Storage};
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

/// Repository for the polymorphic uploads table.
///
/// All upload kinds live in one table discriminated by `kind`; reads resolve
/// the concrete subtype from the row. The repository also owns the lifecycle
/// around the file: the proposed storage key is resolved against existing
/// files, the byte size is captured into `file_size` in the same insert, and
/// deleting a file-backed record removes its file afterwards, best-effort.
#[derive(Clone)]
pub struct UploadRepository {
    pool: PgPool,
    storage: Arc<dyn Storage>,
    paths: PathConfig,
}

const INSERT_UPLOAD: &str = r#"
    INSERT INTO uploads (
        id, kind, title, identifier, form,
        filename, original_filename, content_type, storage_key, storage_url,
        file_size, text_category, album_id, created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    RETURNING *
"#;

impl UploadRepository {
    pub fn new(pool: PgPool, storage: Arc<dyn Storage>, paths: PathConfig) -> Self {
        Self {
            pool,
            storage,
            paths,
        }
    }

    /// Store the payload under an available variant of the proposed key.
    /// Returns (stored filename, storage key, storage url).
    async fn store_file(
        &self,
        proposed_key: &str,
        data: &[u8],
    ) -> Result<(String, String, String), AppError> {
        let key = self
            .storage
            .available_key(proposed_key)
            .await
            .map_err(|e| AppError::Storage(format!("Key resolution failed: {}", e)))?;
        let url = self
            .storage
            .put(&key, data)
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {}", e)))?;
        let filename = key.rsplit('/').next().unwrap_or(&key).to_string();
        Ok((filename, key, url))
    }

    /// Remove a stored file after a failed insert so validation/DB errors
    /// never leave stray files behind.
    async fn discard_file(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(error = %e, storage_key = %key, "Failed to discard stored file after insert error");
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_file_backed(
        &self,
        kind: UploadKind,
        title: String,
        identifier: String,
        form: UploadForm,
        proposed_key: String,
        original_filename: String,
        content_type: String,
        data: Vec<u8>,
        file_size: Option<i64>,
        text_category: Option<TextCategory>,
        album_id: Option<Uuid>,
    ) -> Result<UploadRow, AppError> {
        let id = Uuid::new_v4();
        let (filename, key, url) = self.store_file(&proposed_key, &data).await?;
        let now = Utc::now();

        let result = sqlx::query_as::<Postgres, UploadRow>(INSERT_UPLOAD)
            .bind(id)
            .bind(kind)
            .bind(&title)
            .bind(&identifier)
            .bind(form)
            .bind(&filename)
            .bind(&original_filename)
            .bind(&content_type)
            .bind(&key)
            .bind(&url)
            .bind(file_size)
            .bind(text_category)
            .bind(album_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row),
            Err(e) => {
                self.discard_file(&key).await;
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    #[tracing::instrument(
        skip(self, data),
        fields(db.table = "uploads", db.operation = "insert", upload_kind = "text")
    )]
    pub async fn create_text(
        &self,
        title: String,
        identifier: String,
        form: UploadForm,
        category: TextCategory,
        original_filename: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<Text, AppError> {
        // Size capture: recorded in the same insert that creates the row
        let file_size = data.len() as i64;
        let proposed = self.paths.text_key(category, &original_filename);
        let row = self
            .insert_file_backed(
                UploadKind::Text,
                title,
                identifier,
                form,
                proposed,
                original_filename,
                content_type,
                data,
                Some(file_size),
                Some(category),
                None,
            )
            .await?;
        to_text(&row)
    }

    #[tracing::instrument(
        skip(self, data),
        fields(db.table = "uploads", db.operation = "insert", upload_kind = "video")
    )]
    pub async fn create_video(
        &self,
        title: String,
        identifier: String,
        form: UploadForm,
        original_filename: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<Video, AppError> {
        let file_size = data.len() as i64;
        let proposed = self.paths.video_key(&original_filename);
        let row = self
            .insert_file_backed(
                UploadKind::Video,
                title,
                identifier,
                form,
                proposed,
                original_filename,
                content_type,
                data,
                Some(file_size),
                None,
                None,
            )
            .await?;
        to_video(&row)
    }

    #[tracing::instrument(
        skip(self, data),
        fields(db.table = "uploads", db.operation = "insert", upload_kind = "audio")
    )]
    pub async fn create_audio(
        &self,
        title: String,
        identifier: String,
        form: UploadForm,
        original_filename: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<Audio, AppError> {
        let file_size = data.len() as i64;
        let proposed = self.paths.audio_key(&original_filename);
        let row = self
            .insert_file_backed(
                UploadKind::Audio,
                title,
                identifier,
                form,
                proposed,
                original_filename,
                content_type,
                data,
                Some(file_size),
                None,
                None,
            )
            .await?;
        to_audio(&row)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "uploads", db.operation = "insert", upload_kind = "audio_album")
    )]
    pub async fn create_album(
        &self,
        title: String,
        identifier: String,
        form: UploadForm,
    ) -> Result<AudioAlbum, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<Postgres, UploadRow>(INSERT_UPLOAD)
            .bind(id)
            .bind(UploadKind::AudioAlbum)
            .bind(&title)
            .bind(&identifier)
            .bind(form)
            .bind(Option::<String>::None)
            .bind(Option::<String>::None)
            .bind(Option::<String>::None)
            .bind(Option::<String>::None)
            .bind(Option::<String>::None)
            .bind(Option::<i64>::None)
            .bind(Option::<TextCategory>::None)
            .bind(Option::<Uuid>::None)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(to_audio_album(&row))
    }

    /// Create a track inside an album. Track files are stored alongside
    /// standalone audio; their `file_size` is not captured.
    #[tracing::instrument(
        skip(self, data),
        fields(db.table = "uploads", db.operation = "insert", upload_kind = "audio_track")
    )]
    #[allow(clippy::too_many_arguments)]
    pub async fn create_track(
        &self,
        album_id: Uuid,
        title: String,
        identifier: String,
        form: UploadForm,
        original_filename: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<AudioTrack, AppError> {
        if self.get_album(album_id).await?.is_none() {
            return Err(AppError::NotFound("Audio album not found".to_string()));
        }

        let proposed = self.paths.audio_key(&original_filename);
        let row = self
            .insert_file_backed(
                UploadKind::AudioTrack,
                title,
                identifier,
                form,
                proposed,
                original_filename,
                content_type,
                data,
                None,
                None,
                Some(album_id),
            )
            .await?;
        to_audio_track(&row)
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Polymorphic read: resolves the concrete subtype from the row's kind.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "uploads", db.operation = "select", db.record_id = %id)
    )]
    pub async fn get(&self, id: Uuid) -> Result<Option<Upload>, AppError> {
        let row: Option<UploadRow> = sqlx::query_as("SELECT * FROM uploads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| to_upload(&r)).transpose()
    }

    async fn get_row_of_kind(
        &self,
        id: Uuid,
        kind: UploadKind,
    ) -> Result<Option<UploadRow>, AppError> {
        let row: Option<UploadRow> =
            sqlx::query_as("SELECT * FROM uploads WHERE id = $1 AND kind = $2")
                .bind(id)
                .bind(kind)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    pub async fn get_text(&self, id: Uuid) -> Result<Option<Text>, AppError> {
        self.get_row_of_kind(id, UploadKind::Text)
            .await?
            .map(|r| to_text(&r))
            .transpose()
    }

    pub async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.get_row_of_kind(id, UploadKind::Video)
            .await?
            .map(|r| to_video(&r))
            .transpose()
    }

    pub async fn get_audio(&self, id: Uuid) -> Result<Option<Audio>, AppError> {
        self.get_row_of_kind(id, UploadKind::Audio)
            .await?
            .map(|r| to_audio(&r))
            .transpose()
    }

    pub async fn get_album(&self, id: Uuid) -> Result<Option<AudioAlbum>, AppError> {
        Ok(self
            .get_row_of_kind(id, UploadKind::AudioAlbum)
            .await?
            .map(|r| to_audio_album(&r)))
    }

    pub async fn get_track(&self, id: Uuid) -> Result<Option<AudioTrack>, AppError> {
        self.get_row_of_kind(id, UploadKind::AudioTrack)
            .await?
            .map(|r| to_audio_track(&r))
            .transpose()
    }

    async fn list_rows_of_kind(&self, kind: UploadKind) -> Result<Vec<UploadRow>, AppError> {
        let rows: Vec<UploadRow> =
            sqlx::query_as("SELECT * FROM uploads WHERE kind = $1 ORDER BY created_at DESC")
                .bind(kind)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "select"))]
    pub async fn list_texts(&self) -> Result<Vec<Text>, AppError> {
        self.list_rows_of_kind(UploadKind::Text)
            .await?
            .iter()
            .map(to_text)
            .collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "select"))]
    pub async fn list_videos(&self) -> Result<Vec<Video>, AppError> {
        self.list_rows_of_kind(UploadKind::Video)
            .await?
            .iter()
            .map(to_video)
            .collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "select"))]
    pub async fn list_audio(&self) -> Result<Vec<Audio>, AppError> {
        self.list_rows_of_kind(UploadKind::Audio)
            .await?
            .iter()
            .map(to_audio)
            .collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "select"))]
    pub async fn list_albums(&self) -> Result<Vec<AudioAlbum>, AppError> {
        Ok(self
            .list_rows_of_kind(UploadKind::AudioAlbum)
            .await?
            .iter()
            .map(to_audio_album)
            .collect())
    }

    /// Tracks of an album in insertion order.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "uploads", db.operation = "select", album_id = %album_id)
    )]
    pub async fn list_tracks(&self, album_id: Uuid) -> Result<Vec<AudioTrack>, AppError> {
        let rows: Vec<UploadRow> = sqlx::query_as(
            "SELECT * FROM uploads WHERE kind = $1 AND album_id = $2 ORDER BY created_at ASC",
        )
        .bind(UploadKind::AudioTrack)
        .bind(album_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(to_audio_track).collect()
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Update the shared metadata of any upload kind.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "uploads", db.operation = "update", db.record_id = %id)
    )]
    pub async fn update_metadata(
        &self,
        id: Uuid,
        title: String,
        identifier: String,
        form: UploadForm,
    ) -> Result<Upload, AppError> {
        let row: Option<UploadRow> = sqlx::query_as::<Postgres, UploadRow>(
            r#"
            UPDATE uploads
            SET title = $2, identifier = $3, form = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&title)
        .bind(&identifier)
        .bind(form)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?;
        to_upload(&row)
    }

    /// Update a text upload. The category is immutable after creation;
    /// passing a different one is rejected. A `None` form keeps the stored one.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "uploads", db.operation = "update", db.record_id = %id)
    )]
    pub async fn update_text(
        &self,
        id: Uuid,
        title: String,
        identifier: String,
        form: Option<UploadForm>,
        category: Option<TextCategory>,
    ) -> Result<Text, AppError> {
        let current = self
            .get_text(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Text upload not found".to_string()))?;

        if let Some(category) = category {
            if category != current.category {
                return Err(AppError::InvalidInput(
                    "Text category cannot be changed after creation".to_string(),
                ));
            }
        }

        let form = form.unwrap_or(current.form);
        match self.update_metadata(id, title, identifier, form).await? {
            Upload::Text(text) => Ok(text),
            other => Err(AppError::Internal(format!(
                "Upload {} changed kind to {} during update",
                id,
                other.kind()
            ))),
        }
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Delete an upload. The row goes first (cascading to album tracks);
    /// then, for file-backed text/video/audio records, the stored file is
    /// removed. File removal is best-effort: a missing file is a no-op and
    /// failures are logged, never surfaced.
    ///
    /// Cascade-deleted children do not get file cleanup; their files are left
    /// for an out-of-band sweep.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "uploads", db.operation = "delete", db.record_id = %id)
    )]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let row: Option<UploadRow> = sqlx::query_as("SELECT * FROM uploads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(false);
        };

        let rows_affected = sqlx::query("DELETE FROM uploads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }

        if matches!(
            row.kind,
            UploadKind::Text | UploadKind::Video | UploadKind::Audio
        ) {
            if let Some(key) = row.storage_key.as_deref() {
                if let Err(e) = self.storage.delete(key).await {
                    tracing::warn!(
                        error = %e,
                        storage_key = %key,
                        "Failed to remove file after upload delete"
                    );
                }
            }
        }

        Ok(true)
    }
}
