//! Upload service: the colorization workflow behind the HTTP handlers.

mod service;

pub use service::{DownloadFile, UploadService};
