//! Inversion-layered layout for bubble-sort graphs.
//!
//! Nodes are grouped into horizontal bands by the inversion count of their
//! associated sequence (the state itself, or an event's source state) and the
//! bands are stacked with the most inversions on top:
//!
//! ```text
//!   y =  1      (super-source, optional)
//!   y =  0      ● 321                       inversions = 3
//!   y = -1    ● 231   ● 312                 inversions = 2
//!   y = -2    ● 132   ● 213                 inversions = 1
//!   y = -3      ● 123                       inversions = 0
//! ```
//!
//! A bubble swap removes exactly one inversion, so every edge points from a
//! band to the one directly below it and no back-edges are ever needed.

mod error;
mod layout;

pub use error::LayoutError;
pub use layout::{layout_causal, layout_multiway, Layer, LayeredLayout, LayoutConfig};

use serde::{Deserialize, Serialize};

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// A 2D position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
