//! Application state shared by every handler.

use crate::services::upload::UploadService;
use chroma_core::Config;
use chroma_db::UploadRepository;
use std::sync::Arc;

/// Everything a request needs: configuration, the upload workflow and the
/// repository handle used for health reporting.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub uploads: UploadService,
    pub repository: Arc<dyn UploadRepository>,
}

impl AppState {
    pub fn new(config: Config, uploads: UploadService) -> Self {
        let repository = uploads.repository();
        Self {
            config,
            uploads,
            repository,
        }
    }
}
