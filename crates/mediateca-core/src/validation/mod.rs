//! Upload validation
//!
//! Validation runs before anything is persisted: extension and Content-Type
//! allowlists, extension/Content-Type agreement, size ceilings, and format
//! sniffing against the leading bytes of the payload.

mod file_format;

pub use file_format::{validate_extension_content_type_match, FileFormat};

use std::path::Path;
use thiserror::Error;

/// Upload validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes exceeds max {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid extension '{extension}', allowed: {allowed:?}")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type '{content_type}', allowed: {allowed:?}")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Missing file extension (filename: {0})")]
    MissingExtension(String),

    #[error("File is empty")]
    EmptyFile,

    #[error("File does not look like {expected}")]
    UnrecognizedFormat { expected: &'static str },
}

/// Lowercased extension of a filename, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Validate an upload against the limits for its kind and the expected
/// on-disk format. Checks run cheapest-first; the first failure wins.
pub fn validate_upload(
    filename: &str,
    content_type: &str,
    data: &[u8],
    max_size: usize,
    allowed_extensions: &[String],
    allowed_content_types: &[String],
    format: FileFormat,
) -> Result<(), ValidationError> {
    if data.is_empty() {
        return Err(ValidationError::EmptyFile);
    }
    if data.len() > max_size {
        return Err(ValidationError::FileTooLarge {
            size: data.len(),
            max: max_size,
        });
    }

    let extension = extension_of(filename)
        .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;
    if !allowed_extensions.iter().any(|e| e == &extension) {
        return Err(ValidationError::InvalidExtension {
            extension,
            allowed: allowed_extensions.to_vec(),
        });
    }

    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase();
    if !allowed_content_types.iter().any(|c| c == &normalized) {
        return Err(ValidationError::InvalidContentType {
            content_type: content_type.to_string(),
            allowed: allowed_content_types.to_vec(),
        });
    }

    validate_extension_content_type_match(filename, content_type)
        .map_err(ValidationError::InvalidFilename)?;

    format.validate(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mp3_limits() -> (Vec<String>, Vec<String>) {
        (
            vec!["mp3".to_string()],
            vec!["audio/mpeg".to_string(), "audio/mp3".to_string()],
        )
    }

    #[test]
    fn test_validate_upload_accepts_valid_mp3() {
        let (exts, types) = mp3_limits();
        let data = b"ID3\x04\x00\x00\x00\x00\x00\x00payload";
        let result = validate_upload(
            "track.mp3",
            "audio/mpeg",
            data,
            1024,
            &exts,
            &types,
            FileFormat::Mp3,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_upload_rejects_empty_file() {
        let (exts, types) = mp3_limits();
        let result =
            validate_upload("track.mp3", "audio/mpeg", b"", 1024, &exts, &types, FileFormat::Mp3);
        assert!(matches!(result, Err(ValidationError::EmptyFile)));
    }

    #[test]
    fn test_validate_upload_rejects_oversize() {
        let (exts, types) = mp3_limits();
        let data = vec![0xFFu8; 2048];
        let result = validate_upload(
            "track.mp3",
            "audio/mpeg",
            &data,
            1024,
            &exts,
            &types,
            FileFormat::Mp3,
        );
        assert!(matches!(
            result,
            Err(ValidationError::FileTooLarge { size: 2048, max: 1024 })
        ));
    }

    #[test]
    fn test_validate_upload_rejects_wrong_extension() {
        let (exts, types) = mp3_limits();
        let data = b"ID3\x04\x00\x00";
        let result = validate_upload(
            "track.wav",
            "audio/mpeg",
            data,
            1024,
            &exts,
            &types,
            FileFormat::Mp3,
        );
        assert!(matches!(result, Err(ValidationError::InvalidExtension { .. })));
    }

    #[test]
    fn test_validate_upload_rejects_missing_extension() {
        let (exts, types) = mp3_limits();
        let result = validate_upload(
            "track",
            "audio/mpeg",
            b"ID3\x04",
            1024,
            &exts,
            &types,
            FileFormat::Mp3,
        );
        assert!(matches!(result, Err(ValidationError::MissingExtension(_))));
    }

    #[test]
    fn test_validate_upload_accepts_content_type_with_params() {
        let (exts, types) = mp3_limits();
        let result = validate_upload(
            "track.mp3",
            "audio/mpeg; charset=binary",
            b"ID3\x04\x00\x00",
            1024,
            &exts,
            &types,
            FileFormat::Mp3,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_upload_rejects_masquerading_payload() {
        let (exts, types) = mp3_limits();
        // pdf bytes with an mp3 filename and content type
        let result = validate_upload(
            "track.mp3",
            "audio/mpeg",
            b"%PDF-1.7 rest",
            1024,
            &exts,
            &types,
            FileFormat::Mp3,
        );
        assert!(matches!(
            result,
            Err(ValidationError::UnrecognizedFormat { expected: "mp3" })
        ));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a/b/report.PDF"), Some("pdf".to_string()));
        assert_eq!(extension_of("noext"), None);
    }
}
