//! Parent-link derivation.
//!
//! Every containment decision in the hierarchy goes through [`derive_links`],
//! a pure function of the entity role, its representative point and a
//! [`ZoneArena`] snapshot of candidate zones.
//!
//! Links are pulled, never pushed. They are recomputed only for the entity
//! being edited; editing a region's polygon leaves the stored links of its
//! sub-regions and points of interest untouched until those are re-submitted.
//!
//! ```text
//! sub-region:        point ──resolve──► regions      ──► region_id
//! point of interest: point ──resolve──► sub-regions  ──► sub_region_id
//!                                                         └─► region_id copied
//!                                                             from that sub-region
//! ```

use crate::error::Result;
use crate::model::{
    Entity, EntityRole, GeometryRecord, Region, RegionId, SubRegion, SubRegionId,
};
use crate::store::ZoneStore;
use gardenmap_spatial::{decode_shape, resolve_parent, Coord, PolygonShape, DEFAULT_POINT_RADIUS};

/// A region as a containment candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionZone {
    pub id: RegionId,
    pub polygon: PolygonShape,
}

/// A sub-region as a containment candidate, with its own stored region link.
#[derive(Debug, Clone, PartialEq)]
pub struct SubRegionZone {
    pub id: SubRegionId,
    pub polygon: PolygonShape,
    pub region_id: Option<RegionId>,
}

/// Candidate zones in resolution order.
///
/// Entities without geometry are not candidates. Order is the order the
/// zones were added, which for store-loaded arenas is ascending id.
#[derive(Debug, Clone, Default)]
pub struct ZoneArena {
    regions: Vec<RegionZone>,
    sub_regions: Vec<SubRegionZone>,
}

impl ZoneArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, id: RegionId, polygon: PolygonShape) -> Self {
        self.regions.push(RegionZone { id, polygon });
        self
    }

    pub fn with_sub_region(
        mut self,
        id: SubRegionId,
        polygon: PolygonShape,
        region_id: Option<RegionId>,
    ) -> Self {
        self.sub_regions.push(SubRegionZone {
            id,
            polygon,
            region_id,
        });
        self
    }

    /// Load the candidates `role` resolves against.
    pub fn load<S: ZoneStore + ?Sized>(store: &S, role: EntityRole) -> Result<Self> {
        match role {
            EntityRole::SubRegion => Self::from_regions(&store.regions()?),
            EntityRole::PointOfInterest => Self::from_sub_regions(&store.sub_regions()?),
            EntityRole::Region | EntityRole::Landmark => Ok(Self::new()),
        }
    }

    pub fn from_regions(regions: &[Region]) -> Result<Self> {
        let mut arena = Self::new();
        for region in regions {
            if let Some(record) = &region.geometry {
                arena = arena.with_region(region.id, candidate_polygon(record)?);
            }
        }
        Ok(arena)
    }

    pub fn from_sub_regions(sub_regions: &[SubRegion]) -> Result<Self> {
        let mut arena = Self::new();
        for sub_region in sub_regions {
            if let Some(record) = &sub_region.geometry {
                arena = arena.with_sub_region(
                    sub_region.id,
                    candidate_polygon(record)?,
                    sub_region.region_id,
                );
            }
        }
        Ok(arena)
    }

    pub fn regions(&self) -> &[RegionZone] {
        &self.regions
    }

    pub fn sub_regions(&self) -> &[SubRegionZone] {
        &self.sub_regions
    }
}

/// Outline of a stored zone. Point-shaped zones become one-vertex rings and
/// fail only if a resolution reaches them.
fn candidate_polygon(record: &GeometryRecord) -> Result<PolygonShape> {
    Ok(decode_shape(record.kind, &record.data, DEFAULT_POINT_RADIUS)?.into_outline())
}

/// Derived parent links of one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParentLinks {
    pub region_id: Option<RegionId>,
    pub sub_region_id: Option<SubRegionId>,
}

impl ParentLinks {
    /// Write the links an entity's role carries; other roles are unchanged.
    pub fn apply(self, entity: &mut Entity) {
        match entity {
            Entity::SubRegion(sub_region) => sub_region.region_id = self.region_id,
            Entity::PointOfInterest(poi) => {
                poi.sub_region_id = self.sub_region_id;
                poi.region_id = self.region_id;
            }
            Entity::Region(_) | Entity::Landmark(_) => {}
        }
    }
}

/// Compute the parent links of an entity of `role` whose representative
/// point is `point`.
///
/// A point of interest takes its `region_id` from the covering sub-region's
/// stored link; region polygons are never tested against it.
pub fn derive_links(role: EntityRole, point: Coord<f64>, arena: &ZoneArena) -> Result<ParentLinks> {
    let links = match role {
        EntityRole::Region | EntityRole::Landmark => ParentLinks::default(),
        EntityRole::SubRegion => ParentLinks {
            region_id: resolve_parent(point, arena.regions.iter().map(|z| (z.id, &z.polygon)))?,
            sub_region_id: None,
        },
        EntityRole::PointOfInterest => {
            let sub_region_id =
                resolve_parent(point, arena.sub_regions.iter().map(|z| (z.id, &z.polygon)))?;
            let region_id = sub_region_id
                .and_then(|id| arena.sub_regions.iter().find(|z| z.id == id))
                .and_then(|z| z.region_id);
            ParentLinks {
                region_id,
                sub_region_id,
            }
        }
    };

    tracing::debug!(
        role = %role,
        x = point.x,
        y = point.y,
        region_id = ?links.region_id,
        sub_region_id = ?links.sub_region_id,
        "derived parent links"
    );
    Ok(links)
}
