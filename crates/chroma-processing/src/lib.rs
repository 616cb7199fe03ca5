//! Chroma Processing Library
//!
//! The colorization pipeline: color-space conversion around an opaque
//! chrominance network, the network adapter itself, and upload validation.
//!
//! # Features
//!
//! - `onnx` (default): ONNX Runtime backed [`OnnxChrominanceModel`]

pub mod color;
pub mod colorizer;
pub mod error;
pub mod network;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod resize;
pub mod validator;

pub use colorizer::{Colorizer, OutputFormat, NETWORK_INPUT_SIZE};
pub use error::ColorizeError;
pub use network::{load_cluster_centers, ChrominanceModel, ColorizationHead};
#[cfg(feature = "onnx")]
pub use onnx::OnnxChrominanceModel;
pub use validator::{UploadValidator, ValidationError};
