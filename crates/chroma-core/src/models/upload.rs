use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// One processed upload: the stored original and its colorized counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct UploadRecord {
    /// Filename as supplied by the client. Not unique and not safe for paths.
    #[schema(example = "portrait.jpg")]
    pub original_filename: String,
    /// Server-generated `{timestamp}_{name}`; identifies the upload.
    #[schema(example = "20240307090502000042_portrait.jpg")]
    pub saved_filename: String,
    /// `{timestamp}_colorized_{name}` in the colorized directory.
    #[schema(example = "20240307090502000042_colorized_portrait.jpg")]
    pub colorized_filename: String,
    pub upload_time: DateTime<Utc>,
}

/// Which of the two stored artifacts a filename refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// The file as uploaded
    Upload,
    /// The pipeline output
    #[default]
    Colorized,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Upload => "upload",
            ImageKind::Colorized => "colorized",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(ImageKind::Upload),
            "colorized" => Ok(ImageKind::Colorized),
            other => Err(format!(
                "Invalid type '{}': expected 'upload' or 'colorized'",
                other
            )),
        }
    }
}

/// Response body for a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "File uploaded and colorized")]
    pub message: String,
    pub filename: String,
    pub colorized_filename: String,
}

impl UploadResponse {
    pub fn from_record(record: &UploadRecord) -> Self {
        Self {
            message: "File uploaded and colorized".to_string(),
            filename: record.saved_filename.clone(),
            colorized_filename: record.colorized_filename.clone(),
        }
    }
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
