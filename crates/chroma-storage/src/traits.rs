//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use chroma_core::{AppError, ImageKind};
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file contents
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// Files are addressed by `(ImageKind, filename)`; each kind maps to its own
/// flat namespace. Filenames are validated with [`crate::validate_filename`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a file, replacing any existing file of the same name
    async fn put(&self, kind: ImageKind, filename: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Read a whole file
    async fn get(&self, kind: ImageKind, filename: &str) -> StorageResult<Vec<u8>>;

    /// Read a file as a stream of chunks
    async fn download_stream(&self, kind: ImageKind, filename: &str) -> StorageResult<ByteStream>;

    /// Check if a file exists
    async fn exists(&self, kind: ImageKind, filename: &str) -> StorageResult<bool>;

    /// Delete a file. Returns `Ok(false)` if there was nothing to delete.
    async fn delete(&self, kind: ImageKind, filename: &str) -> StorageResult<bool>;

    /// Size in bytes of an existing file
    async fn content_length(&self, kind: ImageKind, filename: &str) -> StorageResult<u64>;
}
