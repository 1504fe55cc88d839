//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement.

use async_trait::async_trait;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for mediapress_core::AppError {
    fn from(err: StorageError) -> Self {
        mediapress_core::AppError::Storage(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (Supabase Storage, local filesystem) must implement
/// this trait. This keeps the upload pipeline decoupled from any specific
/// backend.
///
/// **Key format:** `{prefix}/{uuid}.{ext}`; see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an object and return (storage_key, public_url).
    ///
    /// Uploads never overwrite: putting to a key that already exists fails
    /// with `AlreadyExists`. The public URL is resolvable without
    /// authentication.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Delete an object by its storage key.
    ///
    /// The ingestion pipeline never calls this when a media item is removed
    /// from a collection; it exists for out-of-band cleanup tooling.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
