//! Zone hierarchy for garden geodata.
//!
//! Regions contain sub-regions, sub-regions contain points of interest. The
//! links between them are never entered by hand: they are derived from
//! geometry each time an entity's shape is submitted.
//!
//! ```text
//! form text ─► HierarchySync::assign_geometry
//!                 │ parse_shape (gardenmap-spatial)
//!                 │ ZoneArena::load ◄── ZoneStore (regions / sub-regions)
//!                 │ derive_links (first covering zone wins)
//!                 ▼
//!              updated Entity ─► ZoneStore::save_entity (caller's unit of work)
//!
//! ZoneStore::geometry_records ─► projector::collect / projector::boundaries
//! ```
//!
//! # Modules
//!
//! - [`model`]: entities, geometry records and ids
//! - [`store`]: persistence trait and the in-memory / JSON-file store
//! - [`links`]: pure parent-link derivation over a candidate arena
//! - [`sync`]: the hierarchy synchronizer
//! - [`projector`]: grouped map payload and boundary overlay
//! - [`error`]: error types

pub mod error;
pub mod links;
pub mod model;
pub mod projector;
pub mod store;
pub mod sync;

pub use error::{Result, ZoneError};
pub use links::{derive_links, ParentLinks, ZoneArena};
pub use model::{
    Entity, EntityRef, EntityRole, GeometryId, GeometryRecord, Landmark, OwnerMeta, OwnerRef,
    PoiId, PointOfInterest, Region, RegionId, SubRegion, SubRegionId,
};
pub use projector::{boundaries, collect, BoundaryFeature, MapFeature, MapPayload, FOCUS_CLASS};
pub use store::{IdSpace, MemoryZoneStore, OwnerLookup, ZoneStore, ZoneTables};
pub use sync::{GeometryForm, HierarchySync};
