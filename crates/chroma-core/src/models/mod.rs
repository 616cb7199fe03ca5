//! Data models for the application
//!
//! Upload records persisted in the metadata store and the DTOs returned by the HTTP API.

mod upload;

pub use upload::*;
