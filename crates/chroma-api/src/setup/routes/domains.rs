//! Upload, history and download routes.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

pub fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload::upload_image))
        .route("/history", get(handlers::history::list_history))
        .route(
            "/history/{saved_filename}",
            delete(handlers::delete::delete_upload),
        )
        .route(
            "/download/{filename}",
            get(handlers::download::download_image),
        )
}
