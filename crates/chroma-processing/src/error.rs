use chroma_core::AppError;
use std::path::PathBuf;

/// Failures of the colorization pipeline
#[derive(Debug, thiserror::Error)]
pub enum ColorizeError {
    /// The input bytes are not an image the decoder understands
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The result could not be encoded to the requested format
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The network or its auxiliary tensors could not be loaded
    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// The forward pass failed
    #[error("model inference failed: {0}")]
    Inference(String),

    /// A tensor did not have the expected shape
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

impl From<ColorizeError> for AppError {
    fn from(err: ColorizeError) -> Self {
        match err {
            ColorizeError::Decode(e) => AppError::ImageDecode(e.to_string()),
            ColorizeError::Encode(e) => AppError::Internal(format!("Failed to encode image: {}", e)),
            other => AppError::Inference(other.to_string()),
        }
    }
}
