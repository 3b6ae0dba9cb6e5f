//! Persistence collaborator.
//!
//! [`ZoneStore`] is the seam between the synchronizer and whatever durably
//! holds zone records. [`MemoryZoneStore`] is the in-process implementation:
//! tables live in memory, every mutation runs inside
//! [`MemoryZoneStore::transaction`], and when the store was opened from a file
//! the committed tables are written back as one JSON snapshot.
//!
//! # Unit of work
//!
//! A transaction runs its closure against a working copy of the tables. On
//! `Ok` the copy is persisted (if file-backed) and then swapped in; on `Err`
//! it is dropped. Nothing outside the closure observes a partial mutation.

use crate::error::{Result, ZoneError};
use crate::model::{
    Entity, EntityRef, EntityRole, GeometryId, GeometryRecord, Landmark, OwnerMeta,
    PointOfInterest, PoiId, Region, RegionId, SubRegion, SubRegionId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Id sequences kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpace {
    /// Geometry records, shared with landmarks.
    Geometry,
    Region,
    SubRegion,
    PointOfInterest,
}

impl IdSpace {
    /// Sequence new entities of `role` draw their id from.
    pub fn for_role(role: EntityRole) -> Self {
        match role {
            EntityRole::Region => IdSpace::Region,
            EntityRole::SubRegion => IdSpace::SubRegion,
            EntityRole::PointOfInterest => IdSpace::PointOfInterest,
            EntityRole::Landmark => IdSpace::Geometry,
        }
    }
}

/// Read queries and mutations the zone hierarchy needs from storage.
///
/// Collection queries return entities in ascending id order; that order is the
/// containment candidate order.
pub trait ZoneStore {
    fn regions(&self) -> Result<Vec<Region>>;

    fn sub_regions(&self) -> Result<Vec<SubRegion>>;

    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>>;

    fn landmarks(&self) -> Result<Vec<Landmark>>;

    fn entity(&self, reference: EntityRef) -> Result<Option<Entity>>;

    /// Draw the next id from a sequence.
    fn allocate_id(&mut self, space: IdSpace) -> Result<u64>;

    /// Insert or replace an entity, including its embedded geometry record.
    fn save_entity(&mut self, entity: &Entity) -> Result<()>;

    /// Remove an entity and its geometry, nulling links that pointed at it.
    fn delete_entity(&mut self, reference: EntityRef) -> Result<Entity>;

    /// All geometry records in ascending geometry id order.
    fn geometry_records(&self) -> Result<Vec<GeometryRecord>> {
        let mut records: Vec<GeometryRecord> = self
            .regions()?
            .into_iter()
            .filter_map(|r| r.geometry)
            .chain(self.sub_regions()?.into_iter().filter_map(|s| s.geometry))
            .chain(
                self.points_of_interest()?
                    .into_iter()
                    .filter_map(|p| p.geometry),
            )
            .chain(self.landmarks()?.into_iter().filter_map(|l| l.geometry))
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

/// Owner join for point-of-interest map features.
pub trait OwnerLookup {
    fn owner_of(&self, geometry_id: GeometryId) -> Option<OwnerMeta>;
}

impl OwnerLookup for HashMap<GeometryId, OwnerMeta> {
    fn owner_of(&self, geometry_id: GeometryId) -> Option<OwnerMeta> {
        self.get(&geometry_id).copied()
    }
}

impl<F> OwnerLookup for F
where
    F: Fn(GeometryId) -> Option<OwnerMeta>,
{
    fn owner_of(&self, geometry_id: GeometryId) -> Option<OwnerMeta> {
        self(geometry_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Sequences {
    geometry: u64,
    region: u64,
    sub_region: u64,
    point_of_interest: u64,
}

/// In-memory zone tables; also the on-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTables {
    regions: BTreeMap<RegionId, Region>,
    sub_regions: BTreeMap<SubRegionId, SubRegion>,
    points_of_interest: BTreeMap<PoiId, PointOfInterest>,
    landmarks: BTreeMap<GeometryId, Landmark>,
    sequences: Sequences,
}

impl ZoneTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner metadata keyed by the owning point of interest's geometry id.
    pub fn owner_index(&self) -> HashMap<GeometryId, OwnerMeta> {
        self.points_of_interest
            .values()
            .filter_map(|poi| {
                poi.geometry.as_ref().map(|g| {
                    (
                        g.id,
                        OwnerMeta {
                            owner_id: poi.id,
                            active: poi.active,
                        },
                    )
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.sub_regions.is_empty()
            && self.points_of_interest.is_empty()
            && self.landmarks.is_empty()
    }
}

impl ZoneStore for ZoneTables {
    fn regions(&self) -> Result<Vec<Region>> {
        Ok(self.regions.values().cloned().collect())
    }

    fn sub_regions(&self) -> Result<Vec<SubRegion>> {
        Ok(self.sub_regions.values().cloned().collect())
    }

    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>> {
        Ok(self.points_of_interest.values().cloned().collect())
    }

    fn landmarks(&self) -> Result<Vec<Landmark>> {
        Ok(self.landmarks.values().cloned().collect())
    }

    fn entity(&self, reference: EntityRef) -> Result<Option<Entity>> {
        Ok(match reference {
            EntityRef::Region(id) => self.regions.get(&id).cloned().map(Entity::Region),
            EntityRef::SubRegion(id) => self.sub_regions.get(&id).cloned().map(Entity::SubRegion),
            EntityRef::PointOfInterest(id) => self
                .points_of_interest
                .get(&id)
                .cloned()
                .map(Entity::PointOfInterest),
            EntityRef::Landmark(id) => self.landmarks.get(&id).cloned().map(Entity::Landmark),
        })
    }

    fn allocate_id(&mut self, space: IdSpace) -> Result<u64> {
        let seq = &mut self.sequences;
        let slot = match space {
            IdSpace::Geometry => &mut seq.geometry,
            IdSpace::Region => &mut seq.region,
            IdSpace::SubRegion => &mut seq.sub_region,
            IdSpace::PointOfInterest => &mut seq.point_of_interest,
        };
        *slot += 1;
        Ok(*slot)
    }

    fn save_entity(&mut self, entity: &Entity) -> Result<()> {
        match entity.clone() {
            Entity::Region(r) => {
                self.regions.insert(r.id, r);
            }
            Entity::SubRegion(s) => {
                self.sub_regions.insert(s.id, s);
            }
            Entity::PointOfInterest(p) => {
                self.points_of_interest.insert(p.id, p);
            }
            // A landmark is its geometry record; without one it does not exist.
            Entity::Landmark(l) if l.geometry.is_none() => {
                self.landmarks.remove(&l.id);
            }
            Entity::Landmark(l) => {
                self.landmarks.insert(l.id, l);
            }
        }
        debug!(entity = %entity.reference(), "saved entity");
        Ok(())
    }

    fn delete_entity(&mut self, reference: EntityRef) -> Result<Entity> {
        let removed = match reference {
            EntityRef::Region(id) => {
                let region = self
                    .regions
                    .remove(&id)
                    .ok_or(ZoneError::NotFound(reference))?;
                for sub_region in self.sub_regions.values_mut() {
                    if sub_region.region_id == Some(id) {
                        sub_region.region_id = None;
                    }
                }
                for poi in self.points_of_interest.values_mut() {
                    if poi.region_id == Some(id) {
                        poi.region_id = None;
                    }
                }
                Entity::Region(region)
            }
            EntityRef::SubRegion(id) => {
                let sub_region = self
                    .sub_regions
                    .remove(&id)
                    .ok_or(ZoneError::NotFound(reference))?;
                // region_id stays: it is only rewritten by re-submission.
                for poi in self.points_of_interest.values_mut() {
                    if poi.sub_region_id == Some(id) {
                        poi.sub_region_id = None;
                    }
                }
                Entity::SubRegion(sub_region)
            }
            EntityRef::PointOfInterest(id) => self
                .points_of_interest
                .remove(&id)
                .map(Entity::PointOfInterest)
                .ok_or(ZoneError::NotFound(reference))?,
            EntityRef::Landmark(id) => self
                .landmarks
                .remove(&id)
                .map(Entity::Landmark)
                .ok_or(ZoneError::NotFound(reference))?,
        };
        debug!(entity = %reference, "deleted entity");
        Ok(removed)
    }
}

/// Zone store held in memory, optionally backed by a JSON snapshot file.
#[derive(Debug, Default)]
pub struct MemoryZoneStore {
    tables: ZoneTables,
    path: Option<PathBuf>,
}

impl MemoryZoneStore {
    /// Create an empty store with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file yields an empty store; the
    /// file is created on the first committed transaction.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            ZoneTables::new()
        };
        debug!(path = %path.display(), "opened zone store");
        Ok(Self {
            tables,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Committed tables, for read-only queries.
    pub fn tables(&self) -> &ZoneTables {
        &self.tables
    }

    /// Run `f` as one unit of work; commit on `Ok`, roll back on `Err`.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ZoneTables) -> Result<T>,
    {
        let mut working = self.tables.clone();
        match f(&mut working) {
            Ok(value) => {
                if let Some(path) = &self.path {
                    write_json_atomic(path, &working)?;
                }
                self.tables = working;
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, "transaction rolled back");
                Err(e)
            }
        }
    }

    /// Write the committed tables to the backing file, if any.
    pub fn flush(&self) -> Result<()> {
        if let Some(path) = &self.path {
            write_json_atomic(path, &self.tables)?;
        }
        Ok(())
    }
}

/// Write a JSON file atomically (write to .tmp then rename).
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content)?;

    // Rename to final path (atomic on most filesystems)
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardenmap_spatial::{ShapeCategory, ShapeKind};

    fn record(id: u64, category: ShapeCategory, data: &str) -> GeometryRecord {
        GeometryRecord {
            id: GeometryId(id),
            category,
            name: format!("g{id}"),
            kind: ShapeKind::Polygon,
            data: data.to_string(),
            owner: None,
        }
    }

    fn seeded() -> ZoneTables {
        let mut tables = ZoneTables::new();
        tables
            .save_entity(&Entity::Region(Region {
                id: RegionId(1),
                name: "north".into(),
                geometry: Some(record(3, ShapeCategory::Region, "0,0\n0,10\n10,10")),
            }))
            .unwrap();
        tables
            .save_entity(&Entity::SubRegion(SubRegion {
                id: SubRegionId(1),
                name: "bed".into(),
                geometry: Some(record(1, ShapeCategory::SubRegion, "1,1\n1,2\n2,2")),
                region_id: Some(RegionId(1)),
            }))
            .unwrap();
        tables
            .save_entity(&Entity::PointOfInterest(PointOfInterest {
                id: PoiId(5),
                name: "oak".into(),
                geometry: Some(GeometryRecord {
                    kind: ShapeKind::Point,
                    ..record(2, ShapeCategory::PoiPoint, "1.5,1.6,250")
                }),
                sub_region_id: Some(SubRegionId(1)),
                region_id: Some(RegionId(1)),
                active: false,
            }))
            .unwrap();
        tables
    }

    #[test]
    fn test_allocate_id_per_space() {
        let mut tables = ZoneTables::new();
        assert_eq!(tables.allocate_id(IdSpace::Region).unwrap(), 1);
        assert_eq!(tables.allocate_id(IdSpace::Region).unwrap(), 2);
        assert_eq!(tables.allocate_id(IdSpace::Geometry).unwrap(), 1);
    }

    #[test]
    fn test_geometry_records_sorted_by_id() {
        let tables = seeded();
        let ids: Vec<u64> = tables
            .geometry_records()
            .unwrap()
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_owner_index() {
        let owners = seeded().owner_index();
        assert_eq!(
            owners.owner_of(GeometryId(2)),
            Some(OwnerMeta {
                owner_id: PoiId(5),
                active: false
            })
        );
        assert_eq!(owners.owner_of(GeometryId(1)), None);
    }

    #[test]
    fn test_delete_region_nulls_links() {
        let mut tables = seeded();
        tables.delete_entity(EntityRef::Region(RegionId(1))).unwrap();
        let sub = tables.sub_regions().unwrap();
        assert_eq!(sub[0].region_id, None);
        let poi = tables.points_of_interest().unwrap();
        assert_eq!(poi[0].region_id, None);
        assert_eq!(poi[0].sub_region_id, Some(SubRegionId(1)));
    }

    #[test]
    fn test_delete_sub_region_keeps_poi_region() {
        let mut tables = seeded();
        tables
            .delete_entity(EntityRef::SubRegion(SubRegionId(1)))
            .unwrap();
        let poi = &tables.points_of_interest().unwrap()[0];
        assert_eq!(poi.sub_region_id, None);
        assert_eq!(poi.region_id, Some(RegionId(1)));
        assert_eq!(tables.geometry_records().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_missing() {
        let mut tables = ZoneTables::new();
        let err = tables
            .delete_entity(EntityRef::Landmark(GeometryId(4)))
            .unwrap_err();
        assert!(matches!(err, ZoneError::NotFound(EntityRef::Landmark(GeometryId(4)))));
    }

    #[test]
    fn test_landmark_without_geometry_is_removed() {
        let mut tables = ZoneTables::new();
        let landmark = Landmark {
            id: GeometryId(7),
            name: "well".into(),
            geometry: Some(record(7, ShapeCategory::OtherPolygon, "0,0\n1,1\n1,0")),
        };
        tables.save_entity(&Entity::Landmark(landmark.clone())).unwrap();
        assert_eq!(tables.landmarks().unwrap().len(), 1);

        let detached = Landmark {
            geometry: None,
            ..landmark
        };
        tables.save_entity(&Entity::Landmark(detached)).unwrap();
        assert!(tables.landmarks().unwrap().is_empty());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut store = MemoryZoneStore::new();
        let result: Result<()> = store.transaction(|tx| {
            tx.allocate_id(IdSpace::Region)?;
            tx.delete_entity(EntityRef::Region(RegionId(99)))?;
            Ok(())
        });
        assert!(result.is_err());
        assert!(store.tables().is_empty());

        // The sequence bump was rolled back with the rest.
        let id = store
            .transaction(|tx| tx.allocate_id(IdSpace::Region))
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_file_backed_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones").join("store.json");

        let mut store = MemoryZoneStore::open(&path).unwrap();
        assert!(!path.exists());
        store
            .transaction(|tx| {
                let expected = seeded();
                *tx = expected;
                Ok(())
            })
            .unwrap();
        assert!(path.exists());

        let reopened = MemoryZoneStore::open(&path).unwrap();
        assert_eq!(reopened.tables(), &seeded());
    }
}
