//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health::{self, HealthCheckResponse};
use chroma_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chroma API",
        version = "0.1.0",
        description = "Automatic colorization of grayscale images. Upload an image, download the colorized result, and browse or delete past uploads."
    ),
    paths(
        handlers::upload::upload_image,
        handlers::history::list_history,
        handlers::delete::delete_upload,
        handlers::download::download_image,
        health::health_check,
    ),
    components(schemas(
        models::UploadRecord,
        models::UploadResponse,
        models::MessageResponse,
        models::ImageKind,
        error::ErrorResponse,
        HealthCheckResponse,
    )),
    tags(
        (name = "uploads", description = "Upload, history and download"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
