//! Map projection.
//!
//! Read-only views over stored geometry for the renderer: the full map grouped
//! by category, and a boundary-only overlay.

use crate::model::{GeometryId, GeometryRecord, OwnerMeta};
use crate::store::OwnerLookup;
use gardenmap_spatial::{decode_shape, serialize_shape, ShapeCategory, ShapeConfig, ShapeKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Display class given to focused features.
pub const FOCUS_CLASS: &str = "focus";

/// One decoded geometry record, decorated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeature {
    pub id: GeometryId,
    pub name: String,
    pub category: ShapeCategory,
    pub kind: ShapeKind,
    pub coordinates: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    pub display_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerMeta>,
}

/// Features grouped by category, in category enumeration order.
///
/// Every category is present, possibly with no features.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MapPayload {
    groups: BTreeMap<ShapeCategory, Vec<MapFeature>>,
}

impl MapPayload {
    fn empty() -> Self {
        Self {
            groups: ShapeCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    pub fn features(&self, category: ShapeCategory) -> &[MapFeature] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeCategory, &[MapFeature])> {
        self.groups.iter().map(|(c, f)| (*c, f.as_slice()))
    }

    /// Total number of features across categories.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode and group every record for the map.
///
/// Records keep their input order within a category. Point-of-interest
/// features carry owner metadata from `owners`. A record whose stored payload
/// no longer decodes is logged and left out.
pub fn collect<L: OwnerLookup + ?Sized>(
    records: &[GeometryRecord],
    focus_ids: &HashSet<GeometryId>,
    owners: &L,
    config: &ShapeConfig,
) -> MapPayload {
    let mut payload = MapPayload::empty();

    for record in records {
        let shape = match decode_shape(record.kind, &record.data, config.radius_for(record.category)) {
            Ok(shape) => shape,
            Err(e) => {
                warn!(geometry = %record.id, error = %e, "skipping undecodable geometry");
                continue;
            }
        };

        let display_class = if focus_ids.contains(&record.id) {
            FOCUS_CLASS.to_string()
        } else {
            record.category.as_str().to_string()
        };
        let owner = if record.category.is_point_of_interest() {
            owners.owner_of(record.id)
        } else {
            None
        };

        payload
            .groups
            .entry(record.category)
            .or_default()
            .push(MapFeature {
                id: record.id,
                name: record.name.clone(),
                category: record.category,
                kind: shape.kind(),
                coordinates: serialize_shape(&shape),
                radius: shape.radius(),
                display_class,
                owner,
            });
    }

    payload
}

/// A zone outline for the boundary overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryFeature {
    pub id: GeometryId,
    pub name: String,
    pub category: ShapeCategory,
    /// Stored payload, unmodified.
    pub points: String,
}

/// Region, sub-region and other-polygon records only, in input order.
pub fn boundaries(records: &[GeometryRecord]) -> Vec<BoundaryFeature> {
    records
        .iter()
        .filter(|r| r.category.is_boundary())
        .map(|r| BoundaryFeature {
            id: r.id,
            name: r.name.clone(),
            category: r.category,
            points: r.data.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnerRef, PoiId};
    use serde_json::json;

    fn record(id: u64, category: ShapeCategory, kind: ShapeKind, data: &str) -> GeometryRecord {
        GeometryRecord {
            id: GeometryId(id),
            category,
            name: format!("shape {id}"),
            kind,
            data: data.to_string(),
            owner: None,
        }
    }

    fn sample() -> Vec<GeometryRecord> {
        vec![
            record(5, ShapeCategory::PoiPoint, ShapeKind::Point, "1,1,30"),
            record(1, ShapeCategory::Region, ShapeKind::Polygon, "0,0\n0,10\n10,10"),
            record(3, ShapeCategory::PoiPoint, ShapeKind::Point, "2,2,30"),
            record(4, ShapeCategory::OtherPolygon, ShapeKind::Polygon, "5,5\n6,6\n6,5"),
            GeometryRecord {
                owner: Some(OwnerRef::PointOfInterest(PoiId(2))),
                ..record(2, ShapeCategory::PoiGroup, ShapeKind::Polygon, "1,1\n2,2\n2,1")
            },
            record(6, ShapeCategory::OtherPoint, ShapeKind::Point, "9,9,1"),
        ]
    }

    fn owners(id: GeometryId) -> Option<OwnerMeta> {
        (id.0 != 6).then_some(OwnerMeta {
            owner_id: PoiId(id.0 * 10),
            active: id.0 % 2 == 1,
        })
    }

    #[test]
    fn test_groups_in_category_order_preserving_input_order() {
        let payload = collect(&sample(), &HashSet::new(), &owners, &ShapeConfig::default());
        let order: Vec<ShapeCategory> = payload.iter().map(|(c, _)| c).collect();
        assert_eq!(order, ShapeCategory::ALL.to_vec());

        let poi_ids: Vec<u64> = payload
            .features(ShapeCategory::PoiPoint)
            .iter()
            .map(|f| f.id.0)
            .collect();
        assert_eq!(poi_ids, vec![5, 3]);
        assert!(payload.features(ShapeCategory::SubRegion).is_empty());
        assert_eq!(payload.len(), 6);
    }

    #[test]
    fn test_focus_changes_display_class() {
        let focus = HashSet::from([GeometryId(3)]);
        let payload = collect(&sample(), &focus, &owners, &ShapeConfig::default());
        let classes: Vec<&str> = payload
            .features(ShapeCategory::PoiPoint)
            .iter()
            .map(|f| f.display_class.as_str())
            .collect();
        assert_eq!(classes, vec!["poi_point", FOCUS_CLASS]);
    }

    #[test]
    fn test_owner_only_on_point_of_interest() {
        let payload = collect(&sample(), &HashSet::new(), &owners, &ShapeConfig::default());
        let group = &payload.features(ShapeCategory::PoiGroup)[0];
        assert_eq!(
            group.owner,
            Some(OwnerMeta {
                owner_id: PoiId(20),
                active: false
            })
        );
        assert_eq!(payload.features(ShapeCategory::Region)[0].owner, None);
        assert_eq!(payload.features(ShapeCategory::OtherPolygon)[0].owner, None);
    }

    #[test]
    fn test_undecodable_record_is_skipped() {
        let mut records = sample();
        records.push(record(7, ShapeCategory::OtherPoint, ShapeKind::Point, "not,a,point"));
        let payload = collect(&records, &HashSet::new(), &owners, &ShapeConfig::default());
        assert_eq!(payload.len(), 6);
    }

    #[test]
    fn test_feature_json_shape() {
        let payload = collect(&sample(), &HashSet::new(), &owners, &ShapeConfig::default());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["poi_point"][0],
            json!({
                "id": 5,
                "name": "shape 5",
                "category": "poi_point",
                "kind": "point",
                "coordinates": "1,1,30",
                "radius": 30.0,
                "display_class": "poi_point",
                "owner": {"owner_id": 50, "active": true}
            })
        );
        assert_eq!(value["sub_region"], json!([]));
        assert!(value["region"][0].get("radius").is_none());
    }

    #[test]
    fn test_boundaries_filter() {
        let outlines = boundaries(&sample());
        let ids: Vec<u64> = outlines.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(outlines[0].points, "0,0\n0,10\n10,10");
        assert_eq!(outlines[1].category, ShapeCategory::OtherPolygon);
    }
}
