//! Image compression: output format selection and encoding.
//!
//! WebP is the preferred output format. Encoder support is probed once per
//! process by round-tripping a known 2x2 image through the WebP codec; when
//! the probe fails, everything falls back to JPEG.

use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::OnceLock;

/// Output format for compressed images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

static WEBP_SUPPORT: OnceLock<bool> = OnceLock::new();

fn probe_webp() -> bool {
    let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
    let encoded = webp::Encoder::from_rgba(&img, 2, 2).encode(80.0);
    if encoded.is_empty() {
        return false;
    }
    match webp::Decoder::new(&encoded).decode() {
        Some(decoded) => decoded.height() == 2,
        None => false,
    }
}

/// Whether the WebP codec is usable in this process. Probed once and cached
/// for the process lifetime.
pub fn webp_supported() -> bool {
    *WEBP_SUPPORT.get_or_init(probe_webp)
}

/// Preferred output format for re-encoded images.
pub fn target_format() -> OutputFormat {
    if webp_supported() {
        OutputFormat::WebP
    } else {
        OutputFormat::Jpeg
    }
}

/// Main compression service
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode an image with the given format and quality (0-100).
    pub fn encode(img: &DynamicImage, format: OutputFormat, quality: f32) -> Result<Bytes> {
        match format {
            OutputFormat::WebP => Self::encode_webp(img, quality),
            OutputFormat::Jpeg => Self::encode_jpeg(img, quality),
        }
    }

    /// Encode to the probed target format, with one fallback re-encode at
    /// JPEG before giving up on the image.
    pub fn encode_with_fallback(
        img: &DynamicImage,
        quality: f32,
    ) -> Result<(Bytes, OutputFormat)> {
        let format = target_format();
        match Self::encode(img, format, quality) {
            Ok(data) => Ok((data, format)),
            Err(err) if format == OutputFormat::WebP => {
                tracing::warn!(error = %err, "WebP encode failed, falling back to JPEG");
                Self::encode(img, OutputFormat::Jpeg, quality).map(|d| (d, OutputFormat::Jpeg))
            }
            Err(err) => Err(err),
        }
    }

    fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Bytes> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let encoder = webp::Encoder::from_rgba(&rgba, width, height);
        let data = encoder.encode(quality.clamp(0.0, 100.0));

        if data.is_empty() {
            return Err(anyhow!("WebP encoder produced no output"));
        }

        Ok(Bytes::copy_from_slice(&data))
    }

    fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Bytes> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality.clamp(0.0, 100.0));
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb)?;
        let jpeg_data = comp.finish()?;

        if jpeg_data.is_empty() {
            return Err(anyhow!("JPEG encoder produced no output"));
        }

        Ok(Bytes::from(jpeg_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_webp_probe_passes() {
        assert!(webp_supported());
        assert_eq!(target_format(), OutputFormat::WebP);
    }

    #[test]
    fn test_webp_probe_is_cached() {
        // Second call hits the cached value and agrees with the first
        assert_eq!(webp_supported(), webp_supported());
    }

    #[test]
    fn test_encode_webp() {
        let data = ImageCompressor::encode(&test_image(), OutputFormat::WebP, 80.0).unwrap();
        assert!(!data.is_empty());
        // RIFF container magic
        assert_eq!(&data[..4], b"RIFF");
    }

    #[test]
    fn test_encode_jpeg() {
        let data = ImageCompressor::encode(&test_image(), OutputFormat::Jpeg, 75.0).unwrap();
        assert!(!data.is_empty());
        // JPEG SOI marker
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_with_fallback_prefers_webp() {
        let (data, format) = ImageCompressor::encode_with_fallback(&test_image(), 70.0).unwrap();
        assert!(!data.is_empty());
        assert_eq!(format, OutputFormat::WebP);
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        // Use a noisy image so quality actually matters
        let mut img = RgbaImage::new(200, 200);
        for y in 0..200 {
            for x in 0..200 {
                let v = ((x * 7 + y * 13) % 256) as u8;
                img.put_pixel(x, y, Rgba([v, 255 - v, x as u8, 255]));
            }
        }
        let img = DynamicImage::ImageRgba8(img);

        let high = ImageCompressor::encode(&img, OutputFormat::Jpeg, 90.0).unwrap();
        let low = ImageCompressor::encode(&img, OutputFormat::Jpeg, 40.0).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::WebP.mime_type(), "image/webp");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }
}
