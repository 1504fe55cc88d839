//! Supabase Storage backend.
//!
//! Talks to the Supabase Storage HTTP API directly:
//!
//! - upload: `POST {base}/storage/v1/object/{bucket}/{key}` with
//!   `x-upsert: false` (no-overwrite) and a cache-control hint
//! - public URL: `{base}/storage/v1/object/public/{bucket}/{key}`
//! - delete: `DELETE {base}/storage/v1/object/{bucket}/{key}`

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use mediapress_core::constants::UPLOAD_CACHE_CONTROL_SECS;
use reqwest::StatusCode;

/// Supabase Storage implementation
#[derive(Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `base_url` - Project base URL (e.g., "https://abc.supabase.co")
    /// * `service_key` - Service-role key used as the bearer token
    /// * `bucket` - Storage bucket name
    pub fn new(base_url: String, service_key: String, bucket: String) -> StorageResult<Self> {
        if base_url.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "Supabase base URL must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(SupabaseStorage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        })
    }

    fn validate_key(storage_key: &str) -> StorageResult<()> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(())
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, storage_key
        )
    }

    /// Generate the public URL for an object key
    fn public_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, storage_key
        )
    }

    /// Extract the error message from a Supabase error body, falling back to
    /// the raw body when it is not the expected JSON shape.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        Self::validate_key(storage_key)?;

        let size = data.len();
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.object_url(storage_key))
            .bearer_auth(&self.service_key)
            .header("content-type", content_type)
            .header(
                "cache-control",
                format!("max-age={}", UPLOAD_CACHE_CONTROL_SECS),
            )
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(&body);

            tracing::error!(
                bucket = %self.bucket,
                key = %storage_key,
                status = %status,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload failed"
            );

            return Err(if status == StatusCode::CONFLICT {
                StorageError::AlreadyExists(storage_key.to_string())
            } else {
                StorageError::UploadFailed(format!("{}: {}", status, message))
            });
        }

        let url = self.public_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok((storage_key.to_string(), url))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Self::validate_key(storage_key)?;

        let response = self
            .client
            .head(self.public_url(storage_key))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            s => Err(StorageError::BackendError(format!(
                "Unexpected status {} checking {}",
                s, storage_key
            ))),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        Self::validate_key(storage_key)?;

        let response = self
            .client
            .delete(self.object_url(storage_key))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            tracing::info!(
                bucket = %self.bucket,
                key = %storage_key,
                "Supabase delete successful"
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::DeleteFailed(format!(
            "{}: {}",
            status,
            Self::error_message(&body)
        )))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
