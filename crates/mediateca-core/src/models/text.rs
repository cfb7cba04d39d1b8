use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

use super::upload::{StoredFile, UploadForm};

/// Text category. Cannot be changed after the record is created; it decides
/// the storage subdirectory the file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "text_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TextCategory {
    Article,
    BookExcerpt,
    BookWhole,
    Other,
}

impl Display for TextCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TextCategory::Article => write!(f, "article"),
            TextCategory::BookExcerpt => write!(f, "book_excerpt"),
            TextCategory::BookWhole => write!(f, "book_whole"),
            TextCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for TextCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(TextCategory::Article),
            "book_excerpt" => Ok(TextCategory::BookExcerpt),
            "book_whole" => Ok(TextCategory::BookWhole),
            "other" => Ok(TextCategory::Other),
            unknown => Err(format!("Unknown text category '{}'", unknown)),
        }
    }
}

/// Text upload (pdf).
#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub category: TextCategory,
    pub file: StoredFile,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Text {
    /// Public content URL: the texts endpoint plus the storage key with the
    /// text subdirectory prefix stripped.
    pub fn public_url(&self, texts_endpoint: &str, text_subdir: &str) -> String {
        let relative = self
            .file
            .key
            .strip_prefix(text_subdir)
            .unwrap_or(&self.file.key);
        format!("{}{}", texts_endpoint, relative)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TextResponse {
    pub id: Uuid,
    pub title: String,
    pub identifier: String,
    pub form: UploadForm,
    pub category: TextCategory,
    pub filename: String,
    pub url: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TextResponse {
    pub fn new(text: Text, texts_endpoint: &str, text_subdir: &str) -> Self {
        let url = text.public_url(texts_endpoint, text_subdir);
        TextResponse {
            id: text.id,
            title: text.title,
            identifier: text.identifier,
            form: text.form,
            category: text.category,
            filename: text.file.original_filename,
            url,
            content_type: text.file.content_type,
            file_size: text.file_size,
            created_at: text.created_at,
            updated_at: text.updated_at,
        }
    }
}
