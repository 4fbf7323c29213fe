//! Error types for layout operations.

use thiserror::Error;

/// Errors that can occur while preparing a layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A spacing parameter is not a positive finite number.
    #[error("Invalid layout config: {field} must be positive and finite (got {value})")]
    InvalidConfig { field: &'static str, value: f32 },
}
