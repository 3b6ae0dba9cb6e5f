use crate::model::{EntityRef, EntityRole};
use gardenmap_spatial::{ShapeCategory, SpatialError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZoneError>;

#[derive(Error, Debug)]
pub enum ZoneError {
    /// Shape text or candidate geometry was rejected.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// Category does not belong to the entity's role.
    #[error("category {category} cannot be assigned to a {role}")]
    CategoryMismatch {
        category: ShapeCategory,
        role: EntityRole,
    },

    /// Entity with the given reference was not found.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZoneError {
    /// True for errors caused by user-submitted shape text.
    pub fn is_user_error(&self) -> bool {
        match self {
            ZoneError::Spatial(e) => e.is_user_error(),
            _ => false,
        }
    }
}
