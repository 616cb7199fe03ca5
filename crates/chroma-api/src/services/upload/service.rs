//! Upload workflow
//!
//! Every upload runs through: validate → stamp → store original → colorize → store result → persist.
//! There is no rollback; when a later step fails the stored original is left behind and logged.

use std::sync::Arc;
use std::time::Instant;

use chroma_core::{upload_timestamp, AppError, Clock, ImageKind, UploadRecord};
use chroma_db::UploadRepository;
use chroma_processing::{Colorizer, OutputFormat, UploadValidator};
use chroma_storage::{ByteStream, Storage, UploadNames};

/// A stored file ready to be streamed to the client
pub struct DownloadFile {
    pub filename: String,
    pub content_length: u64,
    pub stream: ByteStream,
}

/// Orchestrates storage, colorization and the metadata store for uploads.
#[derive(Clone)]
pub struct UploadService {
    repository: Arc<dyn UploadRepository>,
    storage: Arc<dyn Storage>,
    colorizer: Arc<Colorizer>,
    clock: Arc<dyn Clock>,
    validator: UploadValidator,
    jpeg_quality: u8,
}

impl UploadService {
    pub fn new(
        repository: Arc<dyn UploadRepository>,
        storage: Arc<dyn Storage>,
        colorizer: Arc<Colorizer>,
        clock: Arc<dyn Clock>,
        validator: UploadValidator,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            repository,
            storage,
            colorizer,
            clock,
            validator,
            jpeg_quality,
        }
    }

    pub fn repository(&self) -> Arc<dyn UploadRepository> {
        self.repository.clone()
    }

    /// Store the original, colorize it, store the result and record both.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn upload(
        &self,
        original_filename: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<UploadRecord, AppError> {
        let start = Instant::now();
        self.validator
            .validate_all(original_filename, content_type, data.len())?;

        let upload_time = self.clock.now();
        let names = UploadNames::new(&upload_timestamp(upload_time), original_filename);

        self.storage
            .put(ImageKind::Upload, &names.saved_filename, data.clone())
            .await?;

        let colorized = match self.colorize(original_filename, data).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    saved_filename = %names.saved_filename,
                    "Colorization failed, original left in upload directory"
                );
                return Err(e);
            }
        };

        if let Err(e) = self
            .storage
            .put(ImageKind::Colorized, &names.colorized_filename, colorized)
            .await
        {
            tracing::warn!(
                saved_filename = %names.saved_filename,
                "Failed to store colorized image, original left in upload directory"
            );
            return Err(e.into());
        }

        let record = UploadRecord {
            original_filename: original_filename.to_string(),
            saved_filename: names.saved_filename,
            colorized_filename: names.colorized_filename,
            upload_time,
        };

        if let Err(e) = self.repository.insert(&record).await {
            tracing::warn!(
                saved_filename = %record.saved_filename,
                colorized_filename = %record.colorized_filename,
                "Failed to record upload, stored files left without metadata"
            );
            return Err(e);
        }

        tracing::info!(
            saved_filename = %record.saved_filename,
            colorized_filename = %record.colorized_filename,
            duration_ms = start.elapsed().as_millis(),
            "Upload colorized"
        );

        Ok(record)
    }

    async fn colorize(&self, original_filename: &str, data: Vec<u8>) -> Result<Vec<u8>, AppError> {
        let colorizer = self.colorizer.clone();
        let output = OutputFormat::for_filename(original_filename, self.jpeg_quality);

        tokio::task::spawn_blocking(move || colorizer.colorize_bytes(&data, output))
            .await
            .map_err(|e| AppError::Internal(format!("Colorization task failed: {}", e)))?
            .map_err(AppError::from)
    }

    /// All uploads, newest first
    pub async fn history(&self) -> Result<Vec<UploadRecord>, AppError> {
        self.repository.list_recent().await
    }

    /// Remove both stored files and then the record.
    ///
    /// File removal is best-effort: a missing or undeletable file is logged and
    /// does not stop the record from being removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, saved_filename: &str) -> Result<(), AppError> {
        let record = self
            .repository
            .find_by_saved_filename(saved_filename)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?;

        for (kind, filename) in [
            (ImageKind::Upload, &record.saved_filename),
            (ImageKind::Colorized, &record.colorized_filename),
        ] {
            match self.storage.delete(kind, filename).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(kind = %kind, filename = %filename, "Stored file already missing");
                }
                Err(e) => {
                    tracing::warn!(kind = %kind, filename = %filename, error = %e, "Failed to delete stored file");
                }
            }
        }

        self.repository
            .delete_by_saved_filename(&record.saved_filename)
            .await?;

        tracing::info!(saved_filename = %record.saved_filename, "Upload deleted");
        Ok(())
    }

    /// Open a stored file of the given kind for streaming.
    pub async fn download(&self, filename: &str, kind: ImageKind) -> Result<DownloadFile, AppError> {
        let content_length = self.storage.content_length(kind, filename).await?;
        let stream = self.storage.download_stream(kind, filename).await?;

        tracing::debug!(filename = %filename, kind = %kind, content_length, "Streaming stored file");

        Ok(DownloadFile {
            filename: filename.to_string(),
            content_length,
            stream,
        })
    }
}
