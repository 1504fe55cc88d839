//! Batch orchestrator.
//!
//! Drives one user-initiated selection end-to-end: cap the file list per the
//! profile, then run each file fully through classify → validate → convert →
//! upload before starting the next. Processing is deliberately sequential to
//! bound peak memory on constrained devices.
//!
//! Per-file errors are recorded and the batch continues; only the
//! zero-success case is a batch-level error. Guarding against two
//! concurrently running batches is the caller's responsibility; the
//! orchestrator holds no cross-batch state.

use std::sync::Arc;

use mediapress_core::{Config, MediaValidator};
use mediapress_storage::Storage;
use tokio_util::sync::CancellationToken;

use crate::classifier::classify;
use crate::convert::FormatConverter;
use crate::heif::{CommandHeifDecoder, HeifDecoder};
use crate::profile::UploadProfile;
use crate::upload::types::{
    BatchError, BatchPhase, BatchReport, FileFailure, SourceFile, UploadProgress,
};
use crate::upload::uploader::UploadClient;

/// Observer for batch progress, fed every phase transition. Implementations
/// must be cheap; they run inline on the orchestrator's path.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: &UploadProgress);
}

/// No-op implementation for headless callers.
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report(&self, _progress: &UploadProgress) {}
}

pub struct BatchUploader {
    converter: FormatConverter,
    uploader: UploadClient,
    validator: MediaValidator,
    reporter: Arc<dyn ProgressReporter>,
}

impl BatchUploader {
    pub fn new(
        storage: Arc<dyn Storage>,
        heif: Arc<dyn HeifDecoder>,
        upload_prefix: impl Into<String>,
    ) -> Self {
        Self {
            converter: FormatConverter::new(heif),
            uploader: UploadClient::new(storage, upload_prefix),
            validator: MediaValidator::default(),
            reporter: Arc::new(NoOpProgressReporter),
        }
    }

    /// Build an uploader from configuration: uploads go under the configured
    /// prefix, size caps come from the config, and HEIC decoding uses the
    /// configured converter tool.
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            converter: FormatConverter::new(Arc::new(CommandHeifDecoder::new(
                config.heif_converter_path.clone(),
            ))),
            uploader: UploadClient::new(storage, config.upload_prefix.clone()),
            validator: MediaValidator::new(
                config.max_image_size_bytes,
                config.max_video_size_bytes,
            ),
            reporter: Arc::new(NoOpProgressReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_validator(mut self, validator: MediaValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Run one batch to completion.
    pub async fn run(
        &self,
        files: Vec<SourceFile>,
        profile: &UploadProfile,
    ) -> Result<BatchReport, BatchError> {
        self.run_cancellable(files, profile, CancellationToken::new())
            .await
    }

    /// Run one batch, stopping before the next file once `cancel` fires.
    /// Files already uploaded stay in the report; the batch is marked
    /// cancelled instead of failed.
    pub async fn run_cancellable(
        &self,
        files: Vec<SourceFile>,
        profile: &UploadProfile,
        cancel: CancellationToken,
    ) -> Result<BatchReport, BatchError> {
        if files.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        let selected = files.len();
        let accepted: Vec<SourceFile> = files.into_iter().take(profile.max_files).collect();
        let dropped = selected - accepted.len();
        let total = accepted.len();

        if dropped > 0 {
            tracing::warn!(
                selected,
                cap = profile.max_files,
                dropped,
                "Selection exceeds batch cap, dropping excess files"
            );
        }

        self.report(BatchPhase::Preparing, 0, total, 5, "Preparing upload");

        let mut report = BatchReport {
            dropped,
            ..BatchReport::default()
        };

        for (i, file) in accepted.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(
                    completed = report.uploaded.len(),
                    remaining = total - i,
                    "Batch cancelled"
                );
                report.cancelled = true;
                break;
            }

            match self.process_one(file, profile, i, total).await {
                Ok(url) => report.uploaded.push(url),
                Err(err) => {
                    tracing::warn!(
                        filename = %file.filename,
                        error = %err,
                        "File skipped, continuing batch"
                    );
                    report.failures.push(FileFailure {
                        filename: file.filename.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        self.report(
            BatchPhase::Completed,
            total,
            total,
            100,
            report.summary(),
        );

        if report.uploaded.is_empty() && !report.cancelled {
            return Err(BatchError::AllFailed {
                failures: report.failures,
            });
        }

        tracing::info!(
            uploaded = report.uploaded.len(),
            failed = report.failures.len(),
            dropped = report.dropped,
            cancelled = report.cancelled,
            "Batch finished"
        );

        Ok(report)
    }

    async fn process_one(
        &self,
        file: &SourceFile,
        profile: &UploadProfile,
        index: usize,
        total: usize,
    ) -> anyhow::Result<String> {
        // Each file owns an equal slice of the 5-95 band; conversion takes
        // the first half of the slice, upload the second.
        let convert_percent = 5 + ((index * 90) / total) as u8;
        self.report(
            BatchPhase::Processing,
            index,
            total,
            convert_percent,
            format!("Processing {} ({}/{})", file.filename, index + 1, total),
        );

        let kind = classify(&file.content_type, &file.filename)?;
        self.validator.validate(kind, &file.filename, file.data.len())?;

        let processed = self.converter.convert(file, kind, profile).await?;

        let upload_percent = 5 + ((index * 90 + 45) / total) as u8;
        self.report(
            BatchPhase::Uploading,
            index,
            total,
            upload_percent,
            format!("Uploading {} ({}/{})", file.filename, index + 1, total),
        );

        let url = self.uploader.upload(&processed, profile).await?;
        Ok(url)
    }

    fn report(
        &self,
        phase: BatchPhase,
        current: usize,
        total: usize,
        percent: u8,
        status: impl Into<String>,
    ) {
        self.reporter.report(&UploadProgress {
            phase,
            current,
            total,
            percent,
            status: status.into(),
        });
    }
}
