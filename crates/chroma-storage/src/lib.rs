//! Chroma Storage Library
//!
//! File storage for uploaded originals and their colorized counterparts.
//!
//! # Layout
//!
//! Two flat directories, one per [`ImageKind`]:
//!
//! - **Uploads**: `{upload_dir}/{timestamp}_{name}`
//! - **Colorized**: `{colorized_dir}/{timestamp}_colorized_{name}`
//!
//! Filenames must not contain `/`, `\` or `..`. Name generation is centralized in the
//! `keys` module so every caller produces the same layout.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use chroma_core::ImageKind;
pub use keys::{sanitize_filename, validate_filename, UploadNames};
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
