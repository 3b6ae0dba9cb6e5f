//! Hierarchy synchronizer.
//!
//! Turns submitted geometry text into an updated entity: parse, validate,
//! derive parent links, then write the geometry record and links onto a copy
//! of the entity. The caller persists the result inside its unit of work.
//!
//! # Ordering
//!
//! All fallible steps (category lookup, parsing, candidate loading, link
//! derivation) run before anything is written, so a failure leaves both the
//! entity and the store unchanged. The only store mutation is drawing a new
//! geometry id, which happens last.

use crate::error::{Result, ZoneError};
use crate::links::{derive_links, ParentLinks, ZoneArena};
use crate::model::{Entity, EntityRef, EntityRole, GeometryId, GeometryRecord};
use crate::store::{IdSpace, ZoneStore};
use gardenmap_spatial::{parse_shape, serialize_shape, Shape, ShapeCategory, ShapeConfig};
use tracing::{debug, warn};

/// Raw form fields for one geometry submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryForm {
    pub category: String,
    pub name: String,
    pub data: String,
}

impl GeometryForm {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Assigns geometry to entities and keeps their parent links in sync.
#[derive(Debug, Clone, Default)]
pub struct HierarchySync {
    config: ShapeConfig,
}

impl HierarchySync {
    pub fn new(config: ShapeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    /// Parse `raw_text` and return a copy of `entity` carrying the new geometry
    /// and re-derived parent links.
    ///
    /// An existing geometry record keeps its id; only its category, name,
    /// shape kind and payload change. Other entities are never re-resolved.
    pub fn assign_geometry<S: ZoneStore + ?Sized>(
        &self,
        store: &mut S,
        entity: &Entity,
        raw_text: &str,
        category: &str,
        display_name: &str,
    ) -> Result<Entity> {
        let category: ShapeCategory = category.parse()?;
        let role = entity.role();
        if !role.accepts(category) {
            return Err(ZoneError::CategoryMismatch { category, role });
        }

        let shape = parse_shape(raw_text, self.config.radius_for(category))?;
        if category.requires_containment_polygon() {
            warn_if_untestable(&shape, category);
        }

        let point = shape.representative_point();
        let arena = ZoneArena::load(&*store, role)?;
        let links = derive_links(role, point, &arena)?;

        let mut updated = entity.clone();
        let record_id = match (updated.geometry(), &updated) {
            (Some(record), _) => record.id,
            (None, Entity::Landmark(landmark)) => landmark.id,
            (None, _) => GeometryId(store.allocate_id(IdSpace::Geometry)?),
        };
        let owner = updated.owner_ref();
        // Same id as before: only the contents of the record change.
        *updated.geometry_slot() = Some(GeometryRecord {
            id: record_id,
            category,
            name: display_name.to_string(),
            kind: shape.kind(),
            data: serialize_shape(&shape),
            owner,
        });
        updated.set_name(display_name);
        links.apply(&mut updated);

        debug!(
            entity = %updated.reference(),
            geometry = %record_id,
            category = %category,
            kind = %shape.kind(),
            "assigned geometry"
        );
        Ok(updated)
    }

    /// Return a copy of `entity` with its geometry removed and derived links
    /// cleared. A landmark without geometry is deleted when saved.
    pub fn detach_geometry(&self, entity: &Entity) -> Entity {
        let mut detached = entity.clone();
        *detached.geometry_slot() = None;
        ParentLinks::default().apply(&mut detached);
        debug!(entity = %detached.reference(), "detached geometry");
        detached
    }

    /// Create (`existing = None`) or edit an entity from form fields and save it.
    ///
    /// The entity role follows from the form's category; `existing` is an id
    /// in that role's id space.
    pub fn submit<S: ZoneStore + ?Sized>(
        &self,
        store: &mut S,
        existing: Option<u64>,
        form: &GeometryForm,
    ) -> Result<Entity> {
        let category: ShapeCategory = form.category.parse()?;
        let entity = match existing {
            Some(id) => {
                let reference = EntityRef::from_category(category, id);
                store
                    .entity(reference)?
                    .ok_or(ZoneError::NotFound(reference))?
            }
            None => {
                let role = EntityRole::for_category(category);
                Entity::blank(role, store.allocate_id(IdSpace::for_role(role))?)
            }
        };

        let updated =
            self.assign_geometry(store, &entity, &form.data, &form.category, &form.name)?;
        store.save_entity(&updated)?;
        Ok(updated)
    }
}

/// Zone geometry is accepted as submitted; dependents that reach it during
/// resolution fail with `DegeneratePolygon`.
fn warn_if_untestable(shape: &Shape, category: ShapeCategory) {
    let vertices = match shape {
        Shape::Polygon(polygon) if polygon.ensure_testable().is_ok() => return,
        Shape::Polygon(polygon) => polygon.len(),
        Shape::Point(_) => 1,
    };
    warn!(
        category = %category,
        vertices,
        "zone geometry cannot be used for containment"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PoiId, RegionId, SubRegionId};
    use crate::store::ZoneTables;
    use gardenmap_spatial::{ShapeKind, SpatialError};

    const SQUARE: &str = "0,0\n0,10\n10,10\n10,0";

    fn sync() -> HierarchySync {
        HierarchySync::default()
    }

    #[test]
    fn test_create_region_allocates_geometry() {
        let mut tables = ZoneTables::new();
        let region = sync()
            .submit(&mut tables, None, &GeometryForm::new("region", "North", SQUARE))
            .unwrap();
        let record = region.geometry().unwrap();
        assert_eq!(region.reference(), EntityRef::Region(RegionId(1)));
        assert_eq!(region.name(), "North");
        assert_eq!(record.id, GeometryId(1));
        assert_eq!(record.kind, ShapeKind::Polygon);
        assert_eq!(record.data, SQUARE);
    }

    #[test]
    fn test_edit_keeps_geometry_identity() {
        let mut tables = ZoneTables::new();
        let s = sync();
        let first = s
            .submit(&mut tables, None, &GeometryForm::new("poi_point", "Oak", "3,3"))
            .unwrap();
        let id = first.geometry().unwrap().id;

        let edited = s
            .submit(
                &mut tables,
                Some(1),
                &GeometryForm::new("poi_group", "Oak grove", "1,1\n1,4\n4,4"),
            )
            .unwrap();
        let record = edited.geometry().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.category, ShapeCategory::PoiGroup);
        assert_eq!(record.kind, ShapeKind::Polygon);
        assert_eq!(record.name, "Oak grove");
        assert_eq!(tables.geometry_records().unwrap().len(), 1);
    }

    #[test]
    fn test_point_radius_from_config() {
        let mut tables = ZoneTables::new();
        let s = HierarchySync::new(
            ShapeConfig::default().with_radius_override(ShapeCategory::OtherPoint, 15.0),
        );
        let landmark = s
            .submit(&mut tables, None, &GeometryForm::new("other_point", "Well", "4,5"))
            .unwrap();
        assert_eq!(landmark.geometry().unwrap().data, "4,5,15");
        // Landmarks share the geometry id space with their own record.
        assert_eq!(
            landmark.reference(),
            EntityRef::Landmark(landmark.geometry().unwrap().id)
        );
    }

    #[test]
    fn test_malformed_leaves_entity_untouched() {
        let mut tables = ZoneTables::new();
        let s = sync();
        let region = s
            .submit(&mut tables, None, &GeometryForm::new("region", "North", SQUARE))
            .unwrap();

        let err = s
            .assign_geometry(&mut tables, &region, "abc", "region", "Renamed")
            .unwrap_err();
        assert!(matches!(err, ZoneError::Spatial(SpatialError::MalformedShape(_))));
        assert!(err.is_user_error());

        let stored = tables.entity(region.reference()).unwrap().unwrap();
        assert_eq!(stored, region);
    }

    #[test]
    fn test_point_zone_fails_dependents_only() {
        let mut tables = ZoneTables::new();
        let s = sync();
        let bed = s
            .submit(&mut tables, None, &GeometryForm::new("sub_region", "Bed", "5,5"))
            .unwrap();
        assert_eq!(bed.region_id(), None);
        assert_eq!(bed.geometry().unwrap().kind, ShapeKind::Point);

        let err = s
            .submit(&mut tables, None, &GeometryForm::new("poi_point", "Oak", "5,5"))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneError::Spatial(SpatialError::DegeneratePolygon { vertices: 1 })
        ));
        // The failed submission drew a POI id but saved nothing.
        assert!(tables.points_of_interest().unwrap().is_empty());
    }

    #[test]
    fn test_category_mismatch() {
        let mut tables = ZoneTables::new();
        let region = Entity::blank(EntityRole::Region, 1);
        let err = sync()
            .assign_geometry(&mut tables, &region, SQUARE, "sub_region", "x")
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneError::CategoryMismatch {
                category: ShapeCategory::SubRegion,
                role: EntityRole::Region
            }
        ));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_unknown_category() {
        let mut tables = ZoneTables::new();
        let err = sync()
            .submit(&mut tables, None, &GeometryForm::new("pond", "x", "1,1"))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneError::Spatial(SpatialError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_edit_missing_entity() {
        let mut tables = ZoneTables::new();
        let err = sync()
            .submit(&mut tables, Some(42), &GeometryForm::new("sub_region", "x", SQUARE))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneError::NotFound(EntityRef::SubRegion(SubRegionId(42)))
        ));
    }

    #[test]
    fn test_detach_clears_links() {
        let mut tables = ZoneTables::new();
        let s = sync();
        s.submit(&mut tables, None, &GeometryForm::new("region", "North", SQUARE))
            .unwrap();
        s.submit(&mut tables, None, &GeometryForm::new("sub_region", "Bed", "1,1\n1,9\n9,9"))
            .unwrap();
        let poi = s
            .submit(&mut tables, None, &GeometryForm::new("poi_point", "Oak", "2,5"))
            .unwrap();
        assert_eq!(poi.sub_region_id(), Some(SubRegionId(1)));

        let detached = s.detach_geometry(&poi);
        assert!(detached.geometry().is_none());
        assert_eq!(detached.region_id(), None);
        assert_eq!(detached.sub_region_id(), None);
        assert_eq!(detached.reference(), EntityRef::PointOfInterest(PoiId(1)));
    }
}
