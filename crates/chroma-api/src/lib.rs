//! Chroma API Library
//!
//! This crate provides the HTTP handlers, the upload workflow and application setup.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::UploadService;
pub use state::AppState;
