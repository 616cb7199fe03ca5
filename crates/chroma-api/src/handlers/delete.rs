use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chroma_core::MessageResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/history/{saved_filename}",
    tag = "uploads",
    params(
        ("saved_filename" = String, Path, description = "Saved filename returned by the upload")
    ),
    responses(
        (status = 200, description = "Upload and both stored files deleted", body = MessageResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_upload"))]
pub async fn delete_upload(
    Path(saved_filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.uploads.delete(&saved_filename).await?;
    Ok(Json(MessageResponse::new("Upload deleted.")))
}
