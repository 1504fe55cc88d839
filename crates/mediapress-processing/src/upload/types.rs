//! Types for the upload pipeline.

use bytes::Bytes;

/// A file as selected by the user, before any processing.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl SourceFile {
    pub fn new(
        data: Vec<u8>,
        content_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            filename: filename.into(),
        }
    }
}

/// Result of conversion: bytes ready for upload with their final content
/// type and a filename carrying the corrected extension.
#[derive(Clone, Debug)]
pub struct ProcessedFile {
    pub data: Bytes,
    pub content_type: String,
    pub filename: String,
}

impl ProcessedFile {
    /// Extension of the output filename (lowercase, without the dot).
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Phase of a running batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Preparing,
    Processing,
    Uploading,
    Completed,
}

/// Ephemeral progress snapshot for UI feedback. The percentage is an
/// estimate blended from file position and sub-phase, not a byte-level
/// measure.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProgress {
    pub phase: BatchPhase,
    /// Index of the file currently being handled (0-based).
    pub current: usize,
    pub total: usize,
    pub percent: u8,
    pub status: String,
}

/// A file the batch skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub error: String,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Public URLs of successful uploads, in completion order.
    pub uploaded: Vec<String>,
    /// Files skipped after classification, conversion, or upload failures.
    pub failures: Vec<FileFailure>,
    /// Files dropped because the selection exceeded the batch cap.
    pub dropped: usize,
    /// Whether the batch stopped early on cancellation.
    pub cancelled: bool,
}

impl BatchReport {
    /// Number of files the batch actually worked on.
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failures.len()
    }

    /// Human-readable outcome line ("3 of 4 files uploaded").
    pub fn summary(&self) -> String {
        format!(
            "{} of {} files uploaded",
            self.uploaded.len(),
            self.attempted()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No files selected")]
    EmptySelection,

    #[error("No files could be uploaded")]
    AllFailed { failures: Vec<FileFailure> },
}
