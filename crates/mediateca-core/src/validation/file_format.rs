//! On-disk format sniffing and extension/Content-Type agreement.

use super::ValidationError;
use std::path::Path;

/// File formats accepted by the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pdf,
    Mp4,
    Mp3,
    WebVtt,
}

impl FileFormat {
    pub fn expected_name(&self) -> &'static str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Mp4 => "mp4",
            FileFormat::Mp3 => "mp3",
            FileFormat::WebVtt => "webvtt",
        }
    }

    /// Check the leading bytes of the payload against this format.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            FileFormat::Pdf => data.starts_with(b"%PDF-"),
            // ISO BMFF: 4-byte box size then "ftyp"
            FileFormat::Mp4 => data.len() >= 12 && &data[4..8] == b"ftyp",
            // ID3v2 tag, or an MPEG audio frame sync (11 set bits)
            FileFormat::Mp3 => {
                data.starts_with(b"ID3")
                    || (data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0)
            }
            // "WEBVTT" header, optionally after a UTF-8 BOM
            FileFormat::WebVtt => {
                let body = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
                body.starts_with(b"WEBVTT")
            }
        }
    }

    pub fn validate(&self, data: &[u8]) -> Result<(), ValidationError> {
        if self.matches(data) {
            Ok(())
        } else {
            Err(ValidationError::UnrecognizedFormat {
                expected: self.expected_name(),
            })
        }
    }
}

/// Validate that Content-Type matches the file extension. This prevents
/// Content-Type spoofing where payloads are uploaded with a legitimate
/// Content-Type under a mismatched name.
pub fn validate_extension_content_type_match(
    filename: &str,
    content_type: &str,
) -> Result<(), String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if extension.is_empty() {
        return Err("File must have an extension".to_string());
    }

    let normalized_content_type = content_type.to_lowercase();

    let expected_content_types: Vec<&str> = match extension.as_str() {
        "pdf" => vec!["application/pdf"],
        "mp4" => vec!["video/mp4"],
        "mp3" => vec!["audio/mpeg", "audio/mp3"],
        "vtt" => vec!["text/vtt"],
        _ => {
            // Unknown extensions are cross-validated against nothing; the
            // per-kind allowlists still apply individually.
            tracing::debug!(
                extension = %extension,
                content_type = %content_type,
                "Unknown extension, skipping Content-Type/extension cross-validation"
            );
            return Ok(());
        }
    };

    if !expected_content_types.iter().any(|ct| {
        normalized_content_type == *ct || normalized_content_type.starts_with(&format!("{};", ct))
    }) {
        return Err(format!(
            "Content-Type '{}' does not match extension '{}'. Expected one of: {}",
            content_type,
            extension,
            expected_content_types.join(", ")
        ));
    }

    Ok(())
}
