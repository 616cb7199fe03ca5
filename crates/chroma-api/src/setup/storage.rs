//! Storage setup

use anyhow::{Context, Result};
use chroma_core::Config;
use chroma_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create both image directories and the storage backend over them
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.upload_dir(), config.colorized_dir())
        .await
        .context("Failed to initialize local storage")?;

    tracing::info!(
        upload_dir = %config.upload_dir().display(),
        colorized_dir = %config.colorized_dir().display(),
        "Local storage initialized"
    );

    Ok(Arc::new(storage))
}
