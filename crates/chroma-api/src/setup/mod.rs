//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod model;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::upload::UploadService;
use crate::state::AppState;
use anyhow::{Context, Result};
use chroma_core::{Config, SystemClock};
use chroma_db::PgUploadRepository;
use chroma_processing::{Colorizer, UploadValidator};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let model = model::load_model(&config).await?;

    let uploads = UploadService::new(
        Arc::new(PgUploadRepository::new(pool)),
        storage,
        Arc::new(Colorizer::new(model)),
        Arc::new(SystemClock),
        UploadValidator::new(
            config.max_file_size_bytes(),
            config.allowed_extensions().to_vec(),
        ),
        config.jpeg_quality(),
    );
    let state = Arc::new(AppState::new(config.clone(), uploads));

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
