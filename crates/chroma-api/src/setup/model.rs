//! Colorization model loading

use anyhow::{Context, Result};
use chroma_core::Config;
use chroma_processing::{ChrominanceModel, OnnxChrominanceModel};
use std::sync::Arc;

/// Load the network once for the lifetime of the process
pub async fn load_model(config: &Config) -> Result<Arc<dyn ChrominanceModel>> {
    let model_path = config.model_path().clone();
    let cluster_centers_path = config.cluster_centers_path().clone();

    let model = tokio::task::spawn_blocking(move || {
        OnnxChrominanceModel::load(&model_path, &cluster_centers_path)
    })
    .await
    .context("Model loading task failed")?
    .context("Failed to load colorization model")?;

    Ok(Arc::new(model))
}
