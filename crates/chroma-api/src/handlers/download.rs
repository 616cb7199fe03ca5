use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chroma_core::{AppError, ImageKind};
use futures::StreamExt;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DownloadQuery {
    /// `colorized` (default) or `upload`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl DownloadQuery {
    fn image_kind(&self) -> Result<ImageKind, AppError> {
        match self.kind.as_deref() {
            None => Ok(ImageKind::default()),
            Some(kind) => kind.parse().map_err(AppError::InvalidInput),
        }
    }
}

/// Download a stored image
///
/// Responses are always labelled `image/jpeg` regardless of the stored encoding.
#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "uploads",
    params(
        ("filename" = String, Path, description = "Saved or colorized filename"),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "Image file", content_type = "image/jpeg"),
        (status = 400, description = "Unknown type", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download"))]
pub async fn download_image(
    Path(filename): Path<String>,
    Query(query): Query<DownloadQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let kind = query.image_kind()?;
    let file = state.uploads.download(&filename, kind).await?;

    let body_stream = file.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CONTENT_LENGTH, file.content_length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        )
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })?;

    Ok(response)
}
