//! File classifier.
//!
//! Decides how a selected file enters the pipeline from its declared content
//! type and filename alone. HEIC detection treats the extension as an
//! equal-weight signal next to the content type: browsers and capture apps
//! disagree on the MIME type they report for HEIC, so neither signal can be
//! trusted on its own.

use mediapress_core::MediaKind;

const HEIC_EXTENSIONS: &[&str] = &["heic", "heif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Unsupported file type: {content_type} ({filename})")]
    Unsupported {
        content_type: String,
        filename: String,
    },
}

impl From<ClassifyError> for mediapress_core::AppError {
    fn from(err: ClassifyError) -> Self {
        mediapress_core::AppError::UnsupportedMedia(err.to_string())
    }
}

fn extension_of(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Classify a file from its declared content type and filename.
///
/// Pure function of its inputs; classifying the same file twice yields the
/// same result.
pub fn classify(content_type: &str, filename: &str) -> Result<MediaKind, ClassifyError> {
    let content_type = content_type.trim().to_lowercase();
    let extension = extension_of(filename);
    let has_ext = |list: &[&str]| {
        extension
            .as_deref()
            .is_some_and(|ext| list.contains(&ext))
    };

    if content_type == "image/heic" || content_type == "image/heif" || has_ext(HEIC_EXTENSIONS) {
        return Ok(MediaKind::HeicImage);
    }

    if content_type.starts_with("video/") || has_ext(VIDEO_EXTENSIONS) {
        return Ok(MediaKind::Video);
    }

    if content_type.starts_with("image/") {
        return Ok(MediaKind::Image);
    }

    Err(ClassifyError::Unsupported {
        content_type,
        filename: filename.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_standard_images() {
        assert_eq!(
            classify("image/jpeg", "photo.jpg").unwrap(),
            MediaKind::Image
        );
        assert_eq!(classify("image/png", "shot.png").unwrap(), MediaKind::Image);
        assert_eq!(
            classify("image/webp", "pic.webp").unwrap(),
            MediaKind::Image
        );
    }

    #[test]
    fn test_classify_heic_by_content_type() {
        assert_eq!(
            classify("image/heic", "photo.bin").unwrap(),
            MediaKind::HeicImage
        );
        assert_eq!(
            classify("image/heif", "photo.bin").unwrap(),
            MediaKind::HeicImage
        );
    }

    #[test]
    fn test_classify_heic_by_extension() {
        // Browsers often report an empty or generic type for HEIC
        assert_eq!(
            classify("", "IMG_0042.HEIC").unwrap(),
            MediaKind::HeicImage
        );
        assert_eq!(
            classify("application/octet-stream", "img.heif").unwrap(),
            MediaKind::HeicImage
        );
    }

    #[test]
    fn test_classify_video_by_content_type() {
        assert_eq!(
            classify("video/mp4", "clip.mp4").unwrap(),
            MediaKind::Video
        );
        assert_eq!(
            classify("video/quicktime", "clip.mov").unwrap(),
            MediaKind::Video
        );
    }

    #[test]
    fn test_classify_video_by_extension() {
        for name in ["a.mp4", "b.MOV", "c.avi", "d.mkv", "e.webm"] {
            assert_eq!(classify("", name).unwrap(), MediaKind::Video, "{}", name);
        }
    }

    #[test]
    fn test_classify_unsupported() {
        assert!(classify("application/pdf", "doc.pdf").is_err());
        assert!(classify("text/plain", "notes.txt").is_err());
        assert!(classify("", "unknown.bin").is_err());
    }

    #[test]
    fn test_classify_heic_wins_over_image_prefix() {
        // image/heic also starts with image/, but must classify as HEIC
        assert_eq!(
            classify("image/heic", "photo.heic").unwrap(),
            MediaKind::HeicImage
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let first = classify("image/jpeg", "photo.jpg").unwrap();
        let second = classify("image/jpeg", "photo.jpg").unwrap();
        assert_eq!(first, second);
    }
}
