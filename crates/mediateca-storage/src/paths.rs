//! Upload path policy
//!
//! Storage keys are built from the configured subdirectories: text uploads
//! under `{text_subdir}{category}/`, video under `{av_subdir}video/`, audio
//! and album tracks under `{av_subdir}audio/`, VTT tracks under the vtt
//! subdirectory. Filenames are sanitized before they become part of a key.

use mediateca_core::config::ArchiveConfig;
use mediateca_core::models::TextCategory;

/// Subdirectory settings used when building storage keys.
#[derive(Debug, Clone)]
pub struct PathConfig {
    pub text_subdir: String,
    pub av_subdir: String,
    pub vtt_subdir: String,
}

impl PathConfig {
    pub fn from_archive_config(config: &ArchiveConfig) -> Self {
        PathConfig {
            text_subdir: config.text_subdir.clone(),
            av_subdir: config.av_subdir.clone(),
            vtt_subdir: config.vtt_subdir.clone(),
        }
    }

    pub fn text_key(&self, category: TextCategory, filename: &str) -> String {
        text_key(&self.text_subdir, category, filename)
    }

    pub fn video_key(&self, filename: &str) -> String {
        video_key(&self.av_subdir, filename)
    }

    pub fn audio_key(&self, filename: &str) -> String {
        audio_key(&self.av_subdir, filename)
    }

    pub fn vtt_key(&self, filename: &str) -> String {
        vtt_key(&self.vtt_subdir, filename)
    }
}

/// Storage subdirectory for a text category.
pub fn category_dir(category: TextCategory) -> &'static str {
    match category {
        TextCategory::Article => "articles",
        TextCategory::BookExcerpt => "books-excerpt",
        TextCategory::BookWhole => "books-whole",
        TextCategory::Other => "other",
    }
}

/// Sanitize a client-supplied filename for use in a storage key: path
/// components are dropped, whitespace becomes `_`, and anything outside
/// `[A-Za-z0-9._-]` is removed.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Proposed storage key for a text upload.
pub fn text_key(text_subdir: &str, category: TextCategory, filename: &str) -> String {
    format!(
        "{}{}/{}",
        with_trailing_slash(text_subdir),
        category_dir(category),
        sanitize_filename(filename)
    )
}

/// Proposed storage key for a video upload.
pub fn video_key(av_subdir: &str, filename: &str) -> String {
    format!(
        "{}video/{}",
        with_trailing_slash(av_subdir),
        sanitize_filename(filename)
    )
}

/// Proposed storage key for an audio upload or album track.
pub fn audio_key(av_subdir: &str, filename: &str) -> String {
    format!(
        "{}audio/{}",
        with_trailing_slash(av_subdir),
        sanitize_filename(filename)
    )
}

/// Proposed storage key for a VTT track.
pub fn vtt_key(vtt_subdir: &str, filename: &str) -> String {
    format!(
        "{}{}",
        with_trailing_slash(vtt_subdir),
        sanitize_filename(filename)
    )
}

/// Split a key into (stem, extension) on the final dot of the final segment.
pub(crate) fn split_key_extension(key: &str) -> (&str, Option<&str>) {
    match key.rfind('.') {
        // A dot inside an earlier path segment is not an extension separator
        Some(idx) if !key[idx..].contains('/') => (&key[..idx], Some(&key[idx + 1..])),
        _ => (key, None),
    }
}

fn with_trailing_slash(subdir: &str) -> String {
    if subdir.is_empty() || subdir.ends_with('/') {
        subdir.to_string()
    } else {
        format!("{}/", subdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dirs() {
        assert_eq!(category_dir(TextCategory::Article), "articles");
        assert_eq!(category_dir(TextCategory::BookExcerpt), "books-excerpt");
        assert_eq!(category_dir(TextCategory::BookWhole), "books-whole");
        assert_eq!(category_dir(TextCategory::Other), "other");
    }

    #[test]
    fn test_sanitize_filename_strips_paths_and_whitespace() {
        assert_eq!(sanitize_filename("my report.pdf"), "my_report.pdf");
        assert_eq!(sanitize_filename("/etc/../passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("C:\\docs\\scan (1).pdf"), "scan_1.pdf");
        assert_eq!(sanitize_filename("überblick.pdf"), "berblick.pdf");
    }

    #[test]
    fn test_sanitize_filename_never_empty_or_dotted() {
        assert_eq!(sanitize_filename("¿¡!?"), "file");
        assert_eq!(sanitize_filename(".."), "file");
        assert_eq!(sanitize_filename("   "), "file");
    }

    #[test]
    fn test_text_key_per_category() {
        assert_eq!(
            text_key("texts/", TextCategory::Article, "a study.pdf"),
            "texts/articles/a_study.pdf"
        );
        assert_eq!(
            text_key("texts/", TextCategory::BookWhole, "tome.pdf"),
            "texts/books-whole/tome.pdf"
        );
        // Same filename in different categories yields distinct keys
        assert_ne!(
            text_key("texts/", TextCategory::Article, "x.pdf"),
            text_key("texts/", TextCategory::Other, "x.pdf")
        );
    }

    #[test]
    fn test_av_and_vtt_keys() {
        assert_eq!(video_key("av/", "clip.mp4"), "av/video/clip.mp4");
        assert_eq!(audio_key("av", "song.mp3"), "av/audio/song.mp3");
        assert_eq!(vtt_key("text/vtt/", "captions en.vtt"), "text/vtt/captions_en.vtt");
    }

    #[test]
    fn test_split_key_extension() {
        assert_eq!(
            split_key_extension("texts/articles/a.pdf"),
            ("texts/articles/a", Some("pdf"))
        );
        assert_eq!(split_key_extension("av/video/raw"), ("av/video/raw", None));
        assert_eq!(
            split_key_extension("text.vtt/noext"),
            ("text.vtt/noext", None)
        );
    }
}
