//! Error types for the multiscale transform engine.
//!
//! Index and access errors are programming errors against the configured
//! layer count; allocation failures and cancellations abort the current
//! decomposition or reconstruction. The I/O variants are only produced by the
//! demo-facing helpers in [`crate::image::io`] and [`crate::config`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`TransformError`].
pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("invalid layer index {index} (transform has {count} layers)")]
    InvalidLayerIndex { index: isize, count: usize },

    #[error("invalid access to nonexistent layer {index}")]
    NonexistentLayer { index: usize },

    #[error("invalid scaling sequence parameter {value} (expected 0 for dyadic or a positive step)")]
    InvalidScalingSequence { value: i32 },

    #[error("invalid kernel filter size {size} (expected an odd size >= 3)")]
    InvalidFilterSize { size: usize },

    #[error("out of memory allocating a {width}x{height} buffer")]
    AllocationFailed { width: usize, height: usize },

    #[error("process aborted")]
    Cancelled,

    #[error("geometry mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    GeometryMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{sample} samples need {required} layers, transform stores {layers}")]
    PrecisionLoss {
        sample: &'static str,
        required: &'static str,
        layers: &'static str,
    },

    #[error("invalid image data: expected {expected} samples, got {actual}")]
    InvalidImageData { expected: usize, actual: usize },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image codec error on {path}")]
    ImageCodec {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("JSON error on {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {details}")]
    Config { details: String },
}

impl TransformError {
    /// True for failures raised by a cooperative abort request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransformError::Cancelled)
    }
}
