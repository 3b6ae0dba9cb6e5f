//! Shape categories.
//!
//! A category is the role a geometry record plays on the map. It decides the
//! expected shape kind and which containment rule applies when the geometry
//! is assigned.

use crate::error::SpatialError;
use crate::geometry::ShapeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a geometry record.
///
/// Variant order is the enumeration order used when grouping map output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    /// Top-level zone boundary.
    Region,
    /// Zone boundary nested inside a region.
    SubRegion,
    /// Single point of interest (a plant in the garden domain).
    PoiPoint,
    /// Group of points of interest drawn as one polygon.
    PoiGroup,
    /// Free-standing point with no containment rule.
    OtherPoint,
    /// Free-standing polygon with no containment rule.
    OtherPolygon,
}

impl ShapeCategory {
    /// All categories, in enumeration order.
    pub const ALL: [ShapeCategory; 6] = [
        ShapeCategory::Region,
        ShapeCategory::SubRegion,
        ShapeCategory::PoiPoint,
        ShapeCategory::PoiGroup,
        ShapeCategory::OtherPoint,
        ShapeCategory::OtherPolygon,
    ];

    /// Canonical snake_case name, also used as the display class.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeCategory::Region => "region",
            ShapeCategory::SubRegion => "sub_region",
            ShapeCategory::PoiPoint => "poi_point",
            ShapeCategory::PoiGroup => "poi_group",
            ShapeCategory::OtherPoint => "other_point",
            ShapeCategory::OtherPolygon => "other_polygon",
        }
    }

    /// Shape kind a record of this category is normally drawn as.
    pub fn expected_kind(&self) -> ShapeKind {
        match self {
            ShapeCategory::PoiPoint | ShapeCategory::OtherPoint => ShapeKind::Point,
            ShapeCategory::Region
            | ShapeCategory::SubRegion
            | ShapeCategory::PoiGroup
            | ShapeCategory::OtherPolygon => ShapeKind::Polygon,
        }
    }

    /// Point-of-interest categories carry owner metadata on the map.
    pub fn is_point_of_interest(&self) -> bool {
        matches!(self, ShapeCategory::PoiPoint | ShapeCategory::PoiGroup)
    }

    /// Categories included in the boundary-only overlay.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            ShapeCategory::Region | ShapeCategory::SubRegion | ShapeCategory::OtherPolygon
        )
    }

    /// Categories whose geometry is later used as a containment candidate.
    pub fn requires_containment_polygon(&self) -> bool {
        matches!(self, ShapeCategory::Region | ShapeCategory::SubRegion)
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeCategory {
    type Err = SpatialError;

    /// Parse a category name (case-insensitive).
    ///
    /// Accepts hyphenated spellings and the `plant_point` / `plant_group`
    /// names found in records written by the garden application.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "region" => Ok(ShapeCategory::Region),
            "sub_region" | "subregion" => Ok(ShapeCategory::SubRegion),
            "poi_point" | "point_of_interest_point" | "plant_point" => {
                Ok(ShapeCategory::PoiPoint)
            }
            "poi_group" | "point_of_interest_group" | "plant_group" => {
                Ok(ShapeCategory::PoiGroup)
            }
            "other_point" => Ok(ShapeCategory::OtherPoint),
            "other_polygon" => Ok(ShapeCategory::OtherPolygon),
            _ => Err(SpatialError::UnknownCategory(s.to_string())),
        }
    }
}
