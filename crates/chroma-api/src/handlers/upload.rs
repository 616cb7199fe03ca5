use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use chroma_core::UploadResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;

/// Upload a grayscale image and colorize it
///
/// The original is stored in the upload directory and the colorized result in the
/// colorized directory, both under a timestamped name derived from the client filename.
///
/// # Errors
/// - `AppError::InvalidInput` - Missing file field, disallowed extension or Content-Type mismatch
/// - `AppError::PayloadTooLarge` - File exceeds size limit
/// - `AppError::ImageDecode` - Bytes are not a decodable image
/// - `AppError::Inference` - The network failed or returned an unexpected shape
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded and colorized", body = UploadResponse),
        (status = 400, description = "Invalid input or undecodable image", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;

    let record = state
        .uploads
        .upload(&file.filename, file.content_type.as_deref(), file.data)
        .await?;

    Ok(Json(UploadResponse::from_record(&record)))
}
