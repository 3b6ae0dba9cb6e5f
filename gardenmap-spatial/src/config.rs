//! Shape codec configuration.

use crate::category::ShapeCategory;
use crate::error::{Result, SpatialError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Radius given to a point when the submitted text omits one, in map units.
pub const DEFAULT_POINT_RADIUS: f64 = 250.0;

/// Configuration for parsing submitted shape text.
///
/// Deserializable from the `[shapes]` table of the project config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Radius used for two-coordinate point text.
    pub default_radius: f64,

    /// Per-category radius overriding `default_radius`.
    pub radius_overrides: BTreeMap<ShapeCategory, f64>,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            default_radius: DEFAULT_POINT_RADIUS,
            radius_overrides: BTreeMap::new(),
        }
    }
}

impl ShapeConfig {
    /// Set the default point radius.
    pub fn with_default_radius(mut self, radius: f64) -> Self {
        self.default_radius = radius;
        self
    }

    /// Override the point radius for one category.
    pub fn with_radius_override(mut self, category: ShapeCategory, radius: f64) -> Self {
        self.radius_overrides.insert(category, radius);
        self
    }

    /// Radius applied to point text of the given category that has no radius.
    pub fn radius_for(&self, category: ShapeCategory) -> f64 {
        self.radius_overrides
            .get(&category)
            .copied()
            .unwrap_or(self.default_radius)
    }

    /// Reject radii that cannot be written to and read back from shape text.
    pub fn validate(&self) -> Result<()> {
        if !self.default_radius.is_finite() {
            return Err(SpatialError::InvalidConfig(format!(
                "default_radius {} is not finite",
                self.default_radius
            )));
        }
        if let Some((category, radius)) = self
            .radius_overrides
            .iter()
            .find(|(_, radius)| !radius.is_finite())
        {
            return Err(SpatialError::InvalidConfig(format!(
                "radius override for {category} ({radius}) is not finite"
            )));
        }
        Ok(())
    }
}
