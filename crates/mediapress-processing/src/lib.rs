//! Mediapress Processing Library
//!
//! This crate implements the media ingestion pipeline: file classification,
//! image conversion and compression, HEIC handling behind a decode seam, and
//! the upload flow (single-file client with retry plus the sequential batch
//! orchestrator).

pub mod classifier;
pub mod compression;
pub mod convert;
pub mod heif;
pub mod profile;
pub mod upload;

// Re-export commonly used types
pub use classifier::{classify, ClassifyError};
pub use compression::{target_format, webp_supported, ImageCompressor, OutputFormat};
pub use convert::{ConvertError, FormatConverter};
pub use heif::{CommandHeifDecoder, HeifDecoder};
pub use profile::{DeviceClass, NetworkQuality, UploadProfile};
pub use upload::{
    BatchError, BatchPhase, BatchReport, BatchUploader, FileFailure, NoOpProgressReporter,
    ProcessedFile, ProgressReporter, SourceFile, UploadClient, UploadProgress,
};
