use crate::models::MediaKind;

/// Common validation errors for media files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Media file validator
///
/// Size limits differ by kind: images (including HEIC sources, which shrink
/// during conversion) get the small cap, videos the large one since they are
/// uploaded as-is.
pub struct MediaValidator {
    max_image_size: usize,
    max_video_size: usize,
}

impl MediaValidator {
    pub fn new(max_image_size: usize, max_video_size: usize) -> Self {
        Self {
            max_image_size,
            max_video_size,
        }
    }

    fn max_size_for(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image | MediaKind::HeicImage => self.max_image_size,
            MediaKind::Video => self.max_video_size,
        }
    }

    /// Validate file size against the cap for its kind
    pub fn validate_file_size(&self, kind: MediaKind, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        let max = self.max_size_for(kind);
        if size > max {
            return Err(ValidationError::FileTooLarge { size, max });
        }

        Ok(())
    }

    /// Validate the filename carries a usable extension
    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        let trimmed = filename.trim();
        if trimmed.is_empty() || trimmed.contains("..") {
            return Err(ValidationError::InvalidFilename(filename.to_string()));
        }

        std::path::Path::new(trimmed)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        Ok(())
    }

    /// Validate all aspects of a file before processing
    pub fn validate(
        &self,
        kind: MediaKind,
        filename: &str,
        size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_filename(filename)?;
        self.validate_file_size(kind, size)?;
        Ok(())
    }
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new(
            crate::constants::MAX_IMAGE_SIZE_BYTES,
            crate::constants::MAX_VIDEO_SIZE_BYTES,
        )
    }
}
