#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-supabase")]
use crate::SupabaseStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use mediapress_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-supabase")]
        StorageBackend::Supabase => {
            let base_url = config.supabase_url.clone().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let service_key = config.supabase_service_key.clone().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_SERVICE_KEY not configured".to_string())
            })?;

            let storage =
                SupabaseStorage::new(base_url, service_key, config.supabase_bucket.clone())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-supabase"))]
        StorageBackend::Supabase => Err(StorageError::ConfigError(
            "Supabase storage backend not available (storage-supabase feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use mediapress_core::constants::{
        DEFAULT_BUCKET, MAX_IMAGE_SIZE_BYTES, MAX_VIDEO_SIZE_BYTES, UPLOAD_PREFIX,
    };

    fn local_config(path: &str) -> Config {
        Config {
            storage_backend: StorageBackend::Local,
            supabase_url: None,
            supabase_service_key: None,
            supabase_bucket: DEFAULT_BUCKET.to_string(),
            local_storage_path: Some(path.to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            upload_prefix: UPLOAD_PREFIX.to_string(),
            heif_converter_path: "convert".to_string(),
            max_image_size_bytes: MAX_IMAGE_SIZE_BYTES,
            max_video_size_bytes: MAX_VIDEO_SIZE_BYTES,
        }
    }

    #[tokio::test]
    async fn test_create_local_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = local_config(dir.path().to_str().unwrap());
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_create_local_storage_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(dir.path().to_str().unwrap());
        config.local_storage_path = None;
        assert!(matches!(
            create_storage(&config).await,
            Err(StorageError::ConfigError(_))
        ));
    }

    #[cfg(feature = "storage-supabase")]
    #[tokio::test]
    async fn test_create_supabase_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(dir.path().to_str().unwrap());
        config.storage_backend = StorageBackend::Supabase;
        config.supabase_url = Some("https://example.supabase.co".to_string());
        config.supabase_service_key = Some("service-key".to_string());

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Supabase);
    }
}
