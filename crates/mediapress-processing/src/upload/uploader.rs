//! Single-file upload client with retry.
//!
//! Pushes one processed file to object storage under a fresh randomized key
//! and resolves its public URL. Failed attempts are retried up to the
//! profile's budget with a fixed delay; each attempt gets a new key so a
//! partially-registered object can never block the retry.

use std::sync::Arc;

use mediapress_storage::{generate_object_key, Storage, StorageResult};

use crate::profile::UploadProfile;
use crate::upload::types::ProcessedFile;

pub struct UploadClient {
    storage: Arc<dyn Storage>,
    prefix: String,
}

impl UploadClient {
    pub fn new(storage: Arc<dyn Storage>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
        }
    }

    /// Upload one processed file, retrying per the profile. Returns the
    /// public URL on success, or the last storage error once the retry
    /// budget is exhausted.
    pub async fn upload(
        &self,
        file: &ProcessedFile,
        profile: &UploadProfile,
    ) -> StorageResult<String> {
        let extension = file.extension();
        let mut attempt: u32 = 0;

        loop {
            let key = generate_object_key(&self.prefix, &extension);

            match self
                .storage
                .upload(&key, &file.content_type, file.data.to_vec())
                .await
            {
                Ok((_, url)) => {
                    tracing::info!(
                        filename = %file.filename,
                        key = %key,
                        url = %url,
                        attempt = attempt + 1,
                        "Upload successful"
                    );
                    return Ok(url);
                }
                Err(err) if attempt < profile.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        filename = %file.filename,
                        error = %err,
                        attempt,
                        attempts_left = profile.max_retries - attempt + 1,
                        "Upload failed, retrying"
                    );
                    tokio::time::sleep(profile.retry_delay).await;
                }
                Err(err) => {
                    tracing::error!(
                        filename = %file.filename,
                        error = %err,
                        attempts = attempt + 1,
                        "Upload failed after retries"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use mediapress_storage::{StorageBackend, StorageError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Storage double that fails the first `fail_first` puts, then succeeds.
    struct FlakyStorage {
        fail_first: usize,
        calls: AtomicUsize,
    }

    impl FlakyStorage {
        fn new(fail_first: usize) -> Self {
            Self {
                fail_first,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Storage for FlakyStorage {
        async fn upload(
            &self,
            storage_key: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> StorageResult<(String, String)> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                Err(StorageError::UploadFailed("simulated outage".to_string()))
            } else {
                Ok((
                    storage_key.to_string(),
                    format!("http://storage.test/{}", storage_key),
                ))
            }
        }

        async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
            Ok(false)
        }

        async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
            Ok(())
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    fn processed_file() -> ProcessedFile {
        ProcessedFile {
            data: Bytes::from_static(b"webp bytes"),
            content_type: "image/webp".to_string(),
            filename: "photo.webp".to_string(),
        }
    }

    fn fast_profile(max_retries: u32) -> UploadProfile {
        UploadProfile {
            max_retries,
            retry_delay: Duration::from_millis(1),
            ..UploadProfile::default()
        }
    }

    #[tokio::test]
    async fn test_upload_first_attempt_succeeds() {
        let storage = Arc::new(FlakyStorage::new(0));
        let client = UploadClient::new(storage.clone(), "announcements");

        let url = client
            .upload(&processed_file(), &fast_profile(2))
            .await
            .unwrap();

        assert!(url.starts_with("http://storage.test/announcements/"));
        assert!(url.ends_with(".webp"));
        assert_eq!(storage.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_succeeds_within_retry_budget() {
        // Fails twice, succeeds on the third attempt with cap 2
        let storage = Arc::new(FlakyStorage::new(2));
        let client = UploadClient::new(storage.clone(), "announcements");

        let url = client
            .upload(&processed_file(), &fast_profile(2))
            .await
            .unwrap();

        assert!(url.contains("announcements/"));
        assert_eq!(storage.call_count(), 3);
    }

    #[tokio::test]
    async fn test_upload_exhausts_retries() {
        let storage = Arc::new(FlakyStorage::new(usize::MAX));
        let client = UploadClient::new(storage.clone(), "announcements");

        let result = client.upload(&processed_file(), &fast_profile(2)).await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        // 1 initial attempt + 2 retries
        assert_eq!(storage.call_count(), 3);
    }
}
