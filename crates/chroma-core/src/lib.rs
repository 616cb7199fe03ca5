//! Chroma Core Library
//!
//! This crate provides core domain models, error types, configuration and the
//! clock used for upload identifiers. It is shared by every Chroma component.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use clock::{upload_timestamp, Clock, ManualClock, SystemClock};
pub use config::{BaseConfig, ColorizerConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ImageKind, MessageResponse, UploadRecord, UploadResponse};
