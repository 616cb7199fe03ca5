//! Chroma DB Library
//!
//! Persistence for upload history records.

pub mod db;

pub use db::{InMemoryUploadRepository, PgUploadRepository, UploadRepository};
