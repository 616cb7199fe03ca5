use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use chroma_core::UploadRecord;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List every upload, newest first
#[utoipa::path(
    get,
    path = "/history",
    tag = "uploads",
    responses(
        (status = 200, description = "Upload history, newest first", body = Vec<UploadRecord>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_history"))]
pub async fn list_history(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.uploads.history().await?;
    tracing::debug!(count = records.len(), "History listed");
    Ok(Json(records))
}
