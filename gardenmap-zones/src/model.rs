//! Zone records.
//!
//! Regions, sub-regions, points of interest and landmarks each own at most one
//! [`GeometryRecord`]. Parent links on sub-regions and points of interest are
//! derived from geometry and are only written by the synchronizer.

use gardenmap_spatial::{ShapeCategory, ShapeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Geometry record id. Landmarks are addressed by this id too.
    GeometryId,
    "geometry"
);
id_type!(RegionId, "region");
id_type!(SubRegionId, "sub-region");
id_type!(
    /// Point-of-interest id (a plant location in the garden domain).
    PoiId,
    "point of interest"
);

/// Back-reference from a geometry record to the entity owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum OwnerRef {
    Region(RegionId),
    SubRegion(SubRegionId),
    PointOfInterest(PoiId),
}

/// Stored geometry of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub id: GeometryId,
    pub category: ShapeCategory,
    pub name: String,
    pub kind: ShapeKind,
    /// Serialized coordinate payload (`x,y,r` or newline-joined `x,y`).
    pub data: String,
    /// `None` for free-standing landmarks.
    pub owner: Option<OwnerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub geometry: Option<GeometryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRegion {
    pub id: SubRegionId,
    pub name: String,
    pub geometry: Option<GeometryRecord>,
    /// Region covering this sub-region's representative point when last resolved.
    pub region_id: Option<RegionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PoiId,
    pub name: String,
    pub geometry: Option<GeometryRecord>,
    pub sub_region_id: Option<SubRegionId>,
    /// Copied from the covering sub-region, never resolved against regions.
    pub region_id: Option<RegionId>,
    /// Owner flag shown on the map (plant alive in the garden domain).
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Free-standing `other_point` / `other_polygon` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: GeometryId,
    pub name: String,
    pub geometry: Option<GeometryRecord>,
}

/// Role an entity plays in the zone hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRole {
    Region,
    SubRegion,
    PointOfInterest,
    Landmark,
}

impl EntityRole {
    /// The role that owns geometry of `category`.
    pub fn for_category(category: ShapeCategory) -> Self {
        match category {
            ShapeCategory::Region => EntityRole::Region,
            ShapeCategory::SubRegion => EntityRole::SubRegion,
            ShapeCategory::PoiPoint | ShapeCategory::PoiGroup => EntityRole::PointOfInterest,
            ShapeCategory::OtherPoint | ShapeCategory::OtherPolygon => EntityRole::Landmark,
        }
    }

    pub fn accepts(&self, category: ShapeCategory) -> bool {
        Self::for_category(category) == *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityRole::Region => "region",
            EntityRole::SubRegion => "sub-region",
            EntityRole::PointOfInterest => "point of interest",
            EntityRole::Landmark => "landmark",
        }
    }
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed handle to an entity in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Region(RegionId),
    SubRegion(SubRegionId),
    PointOfInterest(PoiId),
    Landmark(GeometryId),
}

impl EntityRef {
    /// Interpret a raw id in the id space of the role owning `category`.
    pub fn from_category(category: ShapeCategory, id: u64) -> Self {
        match EntityRole::for_category(category) {
            EntityRole::Region => EntityRef::Region(RegionId(id)),
            EntityRole::SubRegion => EntityRef::SubRegion(SubRegionId(id)),
            EntityRole::PointOfInterest => EntityRef::PointOfInterest(PoiId(id)),
            EntityRole::Landmark => EntityRef::Landmark(GeometryId(id)),
        }
    }

    pub fn role(&self) -> EntityRole {
        match self {
            EntityRef::Region(_) => EntityRole::Region,
            EntityRef::SubRegion(_) => EntityRole::SubRegion,
            EntityRef::PointOfInterest(_) => EntityRole::PointOfInterest,
            EntityRef::Landmark(_) => EntityRole::Landmark,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Region(id) => write!(f, "{id}"),
            EntityRef::SubRegion(id) => write!(f, "{id}"),
            EntityRef::PointOfInterest(id) => write!(f, "{id}"),
            EntityRef::Landmark(id) => write!(f, "landmark #{}", id.0),
        }
    }
}

/// Any geometry-bearing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Entity {
    Region(Region),
    SubRegion(SubRegion),
    PointOfInterest(PointOfInterest),
    Landmark(Landmark),
}

impl Entity {
    /// A new entity of `role` with no geometry and no links.
    pub fn blank(role: EntityRole, id: u64) -> Self {
        match role {
            EntityRole::Region => Entity::Region(Region {
                id: RegionId(id),
                name: String::new(),
                geometry: None,
            }),
            EntityRole::SubRegion => Entity::SubRegion(SubRegion {
                id: SubRegionId(id),
                name: String::new(),
                geometry: None,
                region_id: None,
            }),
            EntityRole::PointOfInterest => Entity::PointOfInterest(PointOfInterest {
                id: PoiId(id),
                name: String::new(),
                geometry: None,
                sub_region_id: None,
                region_id: None,
                active: true,
            }),
            EntityRole::Landmark => Entity::Landmark(Landmark {
                id: GeometryId(id),
                name: String::new(),
                geometry: None,
            }),
        }
    }

    pub fn role(&self) -> EntityRole {
        self.reference().role()
    }

    pub fn reference(&self) -> EntityRef {
        match self {
            Entity::Region(r) => EntityRef::Region(r.id),
            Entity::SubRegion(s) => EntityRef::SubRegion(s.id),
            Entity::PointOfInterest(p) => EntityRef::PointOfInterest(p.id),
            Entity::Landmark(l) => EntityRef::Landmark(l.id),
        }
    }

    /// Back-reference stored on this entity's geometry record.
    pub fn owner_ref(&self) -> Option<OwnerRef> {
        match self {
            Entity::Region(r) => Some(OwnerRef::Region(r.id)),
            Entity::SubRegion(s) => Some(OwnerRef::SubRegion(s.id)),
            Entity::PointOfInterest(p) => Some(OwnerRef::PointOfInterest(p.id)),
            Entity::Landmark(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Region(r) => &r.name,
            Entity::SubRegion(s) => &s.name,
            Entity::PointOfInterest(p) => &p.name,
            Entity::Landmark(l) => &l.name,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        let slot = match self {
            Entity::Region(r) => &mut r.name,
            Entity::SubRegion(s) => &mut s.name,
            Entity::PointOfInterest(p) => &mut p.name,
            Entity::Landmark(l) => &mut l.name,
        };
        *slot = name.to_string();
    }

    pub fn geometry(&self) -> Option<&GeometryRecord> {
        match self {
            Entity::Region(r) => r.geometry.as_ref(),
            Entity::SubRegion(s) => s.geometry.as_ref(),
            Entity::PointOfInterest(p) => p.geometry.as_ref(),
            Entity::Landmark(l) => l.geometry.as_ref(),
        }
    }

    pub(crate) fn geometry_slot(&mut self) -> &mut Option<GeometryRecord> {
        match self {
            Entity::Region(r) => &mut r.geometry,
            Entity::SubRegion(s) => &mut s.geometry,
            Entity::PointOfInterest(p) => &mut p.geometry,
            Entity::Landmark(l) => &mut l.geometry,
        }
    }

    pub fn region_id(&self) -> Option<RegionId> {
        match self {
            Entity::SubRegion(s) => s.region_id,
            Entity::PointOfInterest(p) => p.region_id,
            Entity::Region(_) | Entity::Landmark(_) => None,
        }
    }

    pub fn sub_region_id(&self) -> Option<SubRegionId> {
        match self {
            Entity::PointOfInterest(p) => p.sub_region_id,
            _ => None,
        }
    }
}

/// Owner data joined onto point-of-interest map features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerMeta {
    pub owner_id: PoiId,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_for_category() {
        assert_eq!(
            EntityRole::for_category(ShapeCategory::PoiGroup),
            EntityRole::PointOfInterest
        );
        assert!(EntityRole::Landmark.accepts(ShapeCategory::OtherPolygon));
        assert!(!EntityRole::Region.accepts(ShapeCategory::SubRegion));
    }

    #[test]
    fn test_blank_entity_matches_reference() {
        let entity = Entity::blank(EntityRole::SubRegion, 4);
        assert_eq!(entity.reference(), EntityRef::SubRegion(SubRegionId(4)));
        assert_eq!(
            entity.owner_ref(),
            Some(OwnerRef::SubRegion(SubRegionId(4)))
        );
        assert!(entity.geometry().is_none());
        assert_eq!(
            EntityRef::from_category(ShapeCategory::OtherPoint, 9),
            EntityRef::Landmark(GeometryId(9))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RegionId(3).to_string(), "region #3");
        assert_eq!(
            EntityRef::PointOfInterest(PoiId(8)).to_string(),
            "point of interest #8"
        );
    }

    #[test]
    fn test_poi_active_defaults_true() {
        let poi: PointOfInterest = serde_json::from_str(
            r#"{"id":1,"name":"oak","geometry":null,"sub_region_id":null,"region_id":null}"#,
        )
        .unwrap();
        assert!(poi.active);
    }
}
