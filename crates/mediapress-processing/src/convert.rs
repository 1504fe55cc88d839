//! Format converter.
//!
//! Produces a normalized upload payload for each classified file:
//!
//! - standard images are decoded, bounded to the profile's maximum
//!   dimension (never upscaled), and re-encoded to WebP with a JPEG
//!   fallback;
//! - HEIC images go through the external decode seam first and are
//!   re-encoded at a fixed near-original quality without resizing;
//! - videos pass through untouched (transcoding is deferred to the
//!   backend/CDN).
//!
//! Decode and encode are CPU-bound and run under `spawn_blocking`.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use image::imageops::FilterType;
use image::DynamicImage;
use mediapress_core::constants::HEIC_REENCODE_QUALITY;
use mediapress_core::MediaKind;

use crate::compression::{ImageCompressor, OutputFormat};
use crate::heif::HeifDecoder;
use crate::profile::UploadProfile;
use crate::upload::types::{ProcessedFile, SourceFile};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("HEIC conversion failed: {0}")]
    Heif(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl From<ConvertError> for mediapress_core::AppError {
    fn from(err: ConvertError) -> Self {
        mediapress_core::AppError::MediaConversion(err.to_string())
    }
}

/// Scale (width, height) so the longer side fits `max_dimension`, preserving
/// aspect ratio. Images already within the bound are left alone.
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }
    let scale = max_dimension as f64 / longest as f64;
    let fitted_w = ((width as f64 * scale).round() as u32).max(1);
    let fitted_h = ((height as f64 * scale).round() as u32).max(1);
    (fitted_w, fitted_h)
}

fn output_filename(original: &str, format: OutputFormat) -> String {
    let stem = std::path::Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("file");
    format!("{}.{}", stem, format.extension())
}

/// Converter for all media kinds; HEIC decoding goes through the seam.
pub struct FormatConverter {
    heif: Arc<dyn HeifDecoder>,
}

impl FormatConverter {
    pub fn new(heif: Arc<dyn HeifDecoder>) -> Self {
        Self { heif }
    }

    /// Convert one classified file into its upload payload.
    pub async fn convert(
        &self,
        source: &SourceFile,
        kind: MediaKind,
        profile: &UploadProfile,
    ) -> Result<ProcessedFile, ConvertError> {
        match kind {
            MediaKind::Image => self.convert_image(source, profile).await,
            MediaKind::HeicImage => self.convert_heic(source).await,
            MediaKind::Video => Ok(ProcessedFile {
                data: Bytes::from(source.data.clone()),
                content_type: source.content_type.clone(),
                filename: source.filename.clone(),
            }),
        }
    }

    async fn convert_image(
        &self,
        source: &SourceFile,
        profile: &UploadProfile,
    ) -> Result<ProcessedFile, ConvertError> {
        let data = source.data.clone();
        let max_dimension = profile.max_dimension;
        let quality = profile.quality;

        let (encoded, format) = tokio::task::spawn_blocking(move || {
            let img = image::ImageReader::new(Cursor::new(&data))
                .with_guessed_format()
                .map_err(|e| ConvertError::Decode(e.to_string()))?
                .decode()
                .map_err(|e| ConvertError::Decode(e.to_string()))?;

            let resized = resize_to_bound(img, max_dimension);

            ImageCompressor::encode_with_fallback(&resized, quality)
                .map_err(|e| ConvertError::Encode(e.to_string()))
        })
        .await
        .map_err(|e| ConvertError::Task(e.to_string()))??;

        let filename = output_filename(&source.filename, format);

        tracing::debug!(
            original = %source.filename,
            output = %filename,
            original_size = source.data.len(),
            converted_size = encoded.len(),
            format = format.mime_type(),
            "Image conversion successful"
        );

        Ok(ProcessedFile {
            data: encoded,
            content_type: format.mime_type().to_string(),
            filename,
        })
    }

    async fn convert_heic(&self, source: &SourceFile) -> Result<ProcessedFile, ConvertError> {
        let img = self
            .heif
            .decode(&source.data)
            .await
            .map_err(|e| ConvertError::Heif(e.to_string()))?;

        // The HEIC source is already lossy; re-encode near original quality
        // and skip resizing on this path.
        let (encoded, format) = tokio::task::spawn_blocking(move || {
            ImageCompressor::encode_with_fallback(&img, HEIC_REENCODE_QUALITY)
                .map_err(|e| ConvertError::Encode(e.to_string()))
        })
        .await
        .map_err(|e| ConvertError::Task(e.to_string()))??;

        let filename = output_filename(&source.filename, format);

        tracing::debug!(
            original = %source.filename,
            output = %filename,
            original_size = source.data.len(),
            converted_size = encoded.len(),
            format = format.mime_type(),
            "HEIC conversion successful"
        );

        Ok(ProcessedFile {
            data: encoded,
            content_type: format.mime_type().to_string(),
            filename,
        })
    }
}

fn resize_to_bound(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (fitted_w, fitted_h) = fit_dimensions(width, height, max_dimension);
    if (fitted_w, fitted_h) == (width, height) {
        img
    } else {
        img.resize_exact(fitted_w, fitted_h, FilterType::Lanczos3)
    }
}
