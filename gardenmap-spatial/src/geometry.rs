//! Shape text codec and geometric primitives.
//!
//! Shapes are submitted and stored as compact text without a type tag:
//!
//! ```text
//! point:    x,y[,r]        single line, radius optional
//! polygon:  x,y            one vertex per line, blank lines ignored
//!           x,y
//!           ...
//! ```
//!
//! # Design
//!
//! Parsing tries the point form first and falls back to the polygon form, so a
//! lone `x,y` line is always a point. Both readers are plain functions returning
//! `Option`/`Result`; no error is raised and caught to pick the form.
//!
//! Numbers are written with the shortest representation that reads back to the
//! same `f64`, so `parse_shape(&serialize_shape(&s), _)` yields `s` exactly.

use crate::error::{Result, SpatialError};
use geo::BoundingRect;
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored shape-kind flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Point,
    Polygon,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Polygon => "polygon",
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, ShapeKind::Polygon)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point with a display radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointShape {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl PointShape {
    /// Build a point; all three values must be finite.
    pub fn new(x: f64, y: f64, radius: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            return Err(SpatialError::MalformedShape(format!(
                "non-finite point ({x}, {y}, radius {radius})"
            )));
        }
        Ok(Self { x, y, radius })
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// A simple polygon given by its vertices in listed order.
///
/// The ring is closed implicitly; the first vertex is not repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    vertices: Vec<Coord<f64>>,
}

impl PolygonShape {
    /// Minimum vertex count for a coverage test.
    pub const MIN_TESTABLE_VERTICES: usize = 3;

    /// Build a polygon from at least two finite vertices.
    ///
    /// A single vertex is rejected because its text form reads back as a point.
    pub fn new(vertices: Vec<Coord<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(SpatialError::MalformedShape(format!(
                "polygon needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(bad) = vertices
            .iter()
            .find(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(SpatialError::MalformedShape(format!(
                "non-finite vertex ({}, {})",
                bad.x, bad.y
            )));
        }
        Ok(Self { vertices })
    }

    /// Build from `(x, y)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(pairs.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// First listed vertex; the polygon's representative point.
    pub fn first_vertex(&self) -> Coord<f64> {
        self.vertices[0]
    }

    /// Fail with `DegeneratePolygon` unless a coverage test is possible.
    pub fn ensure_testable(&self) -> Result<()> {
        if self.vertices.len() < Self::MIN_TESTABLE_VERTICES {
            return Err(SpatialError::DegeneratePolygon {
                vertices: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Convert to a geo-types polygon with no interior rings.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.vertices.clone()), vec![])
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_polygon(&self.to_polygon())
    }
}

/// A parsed shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(PointShape),
    Polygon(PolygonShape),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point(_) => ShapeKind::Point,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Coordinate used for containment tests: the point itself, or the
    /// polygon's first vertex.
    pub fn representative_point(&self) -> Coord<f64> {
        match self {
            Shape::Point(point) => point.coord(),
            Shape::Polygon(polygon) => polygon.first_vertex(),
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonShape> {
        match self {
            Shape::Polygon(polygon) => Some(polygon),
            Shape::Point(_) => None,
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Shape::Point(point) => Some(point.radius),
            Shape::Polygon(_) => None,
        }
    }

    /// The shape's outline as a polygon ring.
    ///
    /// A point becomes a single-vertex ring, which coverage tests reject with
    /// `DegeneratePolygon`.
    pub fn into_outline(self) -> PolygonShape {
        match self {
            Shape::Point(point) => PolygonShape {
                vertices: vec![point.coord()],
            },
            Shape::Polygon(polygon) => polygon,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Point(p) => write!(f, "{},{},{}", p.x, p.y, p.radius),
            Shape::Polygon(poly) => {
                for (i, v) in poly.vertices.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{},{}", v.x, v.y)?;
                }
                Ok(())
            }
        }
    }
}

/// Axis-aligned bounding box in map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Check if this bbox contains a coordinate (edges included).
    pub fn contains_point(&self, c: Coord<f64>) -> bool {
        c.x >= self.min_x && c.x <= self.max_x && c.y >= self.min_y && c.y <= self.max_y
    }

    pub fn from_polygon(polygon: &Polygon<f64>) -> Option<Self> {
        let rect = polygon.bounding_rect()?;
        Some(Self {
            min_x: rect.min().x,
            max_x: rect.max().x,
            min_y: rect.min().y,
            max_y: rect.max().y,
        })
    }
}

/// Parse user-submitted shape text, point form first.
///
/// `default_radius` is used when point text omits the radius.
pub fn parse_shape(text: &str, default_radius: f64) -> Result<Shape> {
    if let Some(point) = read_point_form(text, default_radius) {
        return point.map(Shape::Point);
    }
    parse_polygon(text).map(Shape::Polygon)
}

/// Decode a stored payload using its shape-kind flag (no fallback).
pub fn decode_shape(kind: ShapeKind, text: &str, default_radius: f64) -> Result<Shape> {
    match kind {
        ShapeKind::Point => read_point_form(text, default_radius)
            .unwrap_or_else(|| {
                Err(SpatialError::MalformedShape(format!(
                    "{text:?} is not a point `x,y[,r]`"
                )))
            })
            .map(Shape::Point),
        ShapeKind::Polygon => parse_polygon(text).map(Shape::Polygon),
    }
}

/// Serialize a shape to its stored text form.
pub fn serialize_shape(shape: &Shape) -> String {
    shape.to_string()
}

/// Single non-blank line of 2 or 3 numbers.
///
/// `None` means the text is not in point form. A point-form line with an
/// unusable default radius is an error, not a fallback to the polygon form.
fn read_point_form(text: &str, default_radius: f64) -> Option<Result<PointShape>> {
    let mut lines = non_blank_lines(text);
    let (_, line) = lines.next()?;
    if lines.next().is_some() {
        return None;
    }
    match parse_numbers(line).ok()?.as_slice() {
        &[_, _] if !default_radius.is_finite() => Some(Err(SpatialError::InvalidConfig(
            format!("default radius {default_radius} is not finite"),
        ))),
        &[x, y] => Some(PointShape::new(x, y, default_radius)),
        &[x, y, radius] => Some(PointShape::new(x, y, radius)),
        _ => None,
    }
}

fn parse_polygon(text: &str) -> Result<PolygonShape> {
    let mut vertices = Vec::new();
    for (line_no, line) in non_blank_lines(text) {
        let values = parse_numbers(line).map_err(|token| {
            SpatialError::MalformedShape(format!("line {line_no}: {token:?} is not a number"))
        })?;
        match values.as_slice() {
            &[x, y] => vertices.push(Coord { x, y }),
            other => {
                return Err(SpatialError::MalformedShape(format!(
                    "line {line_no}: expected `x,y`, found {} value(s)",
                    other.len()
                )))
            }
        }
    }
    if vertices.is_empty() {
        return Err(SpatialError::MalformedShape("no coordinates found".into()));
    }
    Ok(PolygonShape { vertices })
}

/// Non-blank lines with their 1-based line numbers.
fn non_blank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Split a line on commas; on failure returns the offending token.
fn parse_numbers(line: &str) -> std::result::Result<Vec<f64>, &str> {
    line.split(',')
        .map(str::trim)
        .map(|token| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(token)
        })
        .collect()
}
