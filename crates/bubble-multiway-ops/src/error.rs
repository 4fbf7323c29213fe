//! Error types for the operations layer.

use std::path::PathBuf;

use bubble_multiway_core::InputError;
use bubble_multiway_layout::LayoutError;
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The input selector could not be built.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Layout parameters were rejected.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// No writer or renderer handles the requested file type.
    #[error("Unsupported output format for {path}: {message}")]
    UnsupportedFormat { path: PathBuf, message: String },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PNG encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpsError {
    /// Create an unsupported-format error.
    pub fn unsupported_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error stems from user input validation.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}
