//! Upload flow: single-file client with retry and the sequential batch
//! orchestrator.

pub mod batch;
pub mod types;
pub mod uploader;

pub use batch::{BatchUploader, NoOpProgressReporter, ProgressReporter};
pub use types::{
    BatchError, BatchPhase, BatchReport, FileFailure, ProcessedFile, SourceFile, UploadProgress,
};
pub use uploader::UploadClient;
