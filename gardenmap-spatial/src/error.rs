//! Error types for shape parsing and containment.

use thiserror::Error;

/// Shape and containment errors.
///
/// `MalformedShape` and `DegeneratePolygon` are caused by user-submitted text and
/// are meant to be rendered back to the form. `UnknownCategory` indicates a
/// caller passing a category outside the recognized set, and `InvalidConfig` a
/// bad configuration file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    /// Text is neither a valid point nor a valid polygon.
    #[error("malformed shape: {0}")]
    MalformedShape(String),

    /// Polygon has fewer than three vertices where a coverage test is required.
    #[error("degenerate polygon: {vertices} vertex(es), at least 3 are required")]
    DegeneratePolygon { vertices: usize },

    /// Category string is not one of the recognized shape categories.
    #[error("unknown shape category: {0:?}")]
    UnknownCategory(String),

    /// Codec configuration value that cannot produce a storable shape.
    #[error("invalid shape config: {0}")]
    InvalidConfig(String),
}

impl SpatialError {
    /// True for errors caused by user input (recoverable, shown on the form).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SpatialError::MalformedShape(_) | SpatialError::DegeneratePolygon { .. }
        )
    }
}

/// Result type for spatial operations.
pub type Result<T> = std::result::Result<T, SpatialError>;
