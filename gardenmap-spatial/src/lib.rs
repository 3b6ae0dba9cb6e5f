//! Shape codec and containment resolution for garden map zones.
//!
//! Geometry arrives as free text from forms (`x,y[,r]` for points, one `x,y`
//! vertex per line for polygons) and is stored in the same text form. This
//! crate turns that text into typed shapes and answers the one spatial
//! question the zone hierarchy needs: which candidate polygon covers a point.
//!
//! ```text
//!   form text ──► parse_shape ──► Shape ──► representative_point
//!                                                   │
//!   candidate (id, PolygonShape) in caller order ───┤
//!                                                   ▼
//!                                     BBox prefilter ─► exact covers (geo)
//!                                                   │
//!                                                   ▼
//!                                          first covering id / None
//! ```
//!
//! # Modules
//!
//! - [`geometry`]: shape types and the text codec
//! - [`containment`]: boundary-inclusive coverage and first-match resolution
//! - [`category`]: shape categories and their roles
//! - [`config`]: codec configuration (default point radius)
//! - [`error`]: error types

pub mod category;
pub mod config;
pub mod containment;
pub mod error;
pub mod geometry;

pub use category::ShapeCategory;
pub use config::{ShapeConfig, DEFAULT_POINT_RADIUS};
pub use containment::{covers, resolve_parent, resolve_parent_with_stats, ResolveStats};
pub use error::{Result, SpatialError};
pub use geometry::{
    decode_shape, parse_shape, serialize_shape, BBox, PointShape, PolygonShape, Shape, ShapeKind,
};

pub use geo_types::Coord;
