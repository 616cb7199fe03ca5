//! Shared filename generation for stored images.
//!
//! Both artifacts of one upload share a timestamp prefix:
//! `{timestamp}_{name}` for the original and `{timestamp}_colorized_{name}` for the result.

use crate::traits::{StorageError, StorageResult};
use std::path::Path;

const MAX_NAME_LENGTH: usize = 200;

/// Filenames for both artifacts of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadNames {
    pub saved_filename: String,
    pub colorized_filename: String,
}

impl UploadNames {
    /// Derive both filenames from the upload timestamp and the client-supplied name.
    pub fn new(timestamp: &str, original_filename: &str) -> Self {
        let name = sanitize_filename(original_filename);
        Self {
            saved_filename: format!("{}_{}", timestamp, name),
            colorized_filename: format!("{}_colorized_{}", timestamp, name),
        }
    }
}

/// Reduce a client-supplied filename to a single safe path component.
///
/// Directory components are dropped and characters outside `[A-Za-z0-9._-]`
/// become `_`. Ordinary names pass through unchanged.
pub fn sanitize_filename(filename: &str) -> String {
    let last_component = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let base = Path::new(last_component)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let mut sanitized: String = base
        .chars()
        .take(MAX_NAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", "_");
    }

    if sanitized.trim_matches(['.', '_']).is_empty() {
        return "file".to_string();
    }

    sanitized
}

/// Reject filenames that could address anything outside a storage directory.
pub fn validate_filename(filename: &str) -> StorageResult<()> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid filename: {}",
            filename
        )));
    }
    Ok(())
}
