//! Configuration module
//!
//! This module provides configuration for the ingestion pipeline: storage
//! backend selection and credentials, the upload path prefix, the HEIF
//! converter tool, and media size limits.

use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_BUCKET, MAX_IMAGE_SIZE_BYTES, MAX_VIDEO_SIZE_BYTES, UPLOAD_PREFIX,
};
use crate::storage_types::StorageBackend;

const MAX_IMAGE_SIZE_MB: usize = MAX_IMAGE_SIZE_BYTES / (1024 * 1024);
const MAX_VIDEO_SIZE_MB: usize = MAX_VIDEO_SIZE_BYTES / (1024 * 1024);
const DEFAULT_HEIF_CONVERTER: &str = "convert";

/// Application configuration for the media ingestion pipeline.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage_backend: StorageBackend,
    // Supabase storage configuration
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub supabase_bucket: String,
    // Local storage configuration
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload configuration
    pub upload_prefix: String,
    // External HEIF decode tool (ImageMagick-compatible)
    pub heif_converter_path: String,
    // Media size limits
    pub max_image_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| StorageBackend::from_str(&s))
            .transpose()?
            .unwrap_or(StorageBackend::Supabase);

        let max_image_size_mb = env::var("MAX_IMAGE_SIZE_MB")
            .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let config = Config {
            storage_backend,
            supabase_url: env::var("SUPABASE_URL").ok().filter(|s| !s.is_empty()),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            supabase_bucket: env::var("SUPABASE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().filter(|s| !s.is_empty()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            upload_prefix: env::var("UPLOAD_PREFIX").unwrap_or_else(|_| UPLOAD_PREFIX.to_string()),
            heif_converter_path: env::var("HEIF_CONVERTER_PATH")
                .unwrap_or_else(|_| DEFAULT_HEIF_CONVERTER.to_string()),
            max_image_size_bytes: max_image_size_mb * 1024 * 1024,
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::Supabase => {
                if self.supabase_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL must be set when using the supabase storage backend"
                    ));
                }
                if self.supabase_service_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_SERVICE_KEY must be set when using the supabase storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
                    ));
                }
            }
        }

        if self.upload_prefix.is_empty() || self.upload_prefix.contains("..") {
            return Err(anyhow::anyhow!(
                "UPLOAD_PREFIX must be a non-empty path segment without '..'"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> Config {
        Config {
            storage_backend: StorageBackend::Local,
            supabase_url: None,
            supabase_service_key: None,
            supabase_bucket: DEFAULT_BUCKET.to_string(),
            local_storage_path: Some("/tmp/mediapress".to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            upload_prefix: UPLOAD_PREFIX.to_string(),
            heif_converter_path: DEFAULT_HEIF_CONVERTER.to_string(),
            max_image_size_bytes: MAX_IMAGE_SIZE_BYTES,
            max_video_size_bytes: MAX_VIDEO_SIZE_BYTES,
        }
    }

    #[test]
    fn test_validate_local_ok() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn test_validate_local_missing_path() {
        let mut config = local_config();
        config.local_storage_path = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_supabase_requires_credentials() {
        let mut config = local_config();
        config.storage_backend = StorageBackend::Supabase;
        assert!(config.validate().is_err());

        config.supabase_url = Some("https://example.supabase.co".to_string());
        config.supabase_service_key = Some("service-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_traversal_prefix() {
        let mut config = local_config();
        config.upload_prefix = "../escape".to_string();
        assert!(config.validate().is_err());
    }
}
