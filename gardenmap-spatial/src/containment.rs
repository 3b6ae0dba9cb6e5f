//! Containment resolution.
//!
//! Finds which candidate polygon covers a representative point. Coverage is
//! boundary-inclusive: a point on an edge or a vertex counts as contained.
//!
//! Candidates are tested in the order the caller supplies them and the first
//! covering candidate wins. Overlapping candidates therefore resolve by input
//! order, not by area or specificity. Callers that need stable answers must
//! supply a stable order.
//!
//! ```text
//! for each (id, polygon) in caller order:
//!     polygon has < 3 vertices  -> Err(DegeneratePolygon)
//!     point outside bbox        -> skip
//!     exact coverage test       -> Ok(Some(id))
//! exhausted                     -> Ok(None)
//! ```

use crate::error::Result;
use crate::geometry::PolygonShape;
use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo_types::Coord;
use std::fmt::Debug;

/// Counters from one resolution, for trace logging and benchmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Candidates pulled from the input sequence.
    pub candidates_inspected: usize,

    /// Candidates skipped by the bbox prefilter.
    pub bbox_rejected: usize,

    /// Candidates that reached the exact coverage test.
    pub exact_tests: usize,
}

/// Boundary-inclusive point-in-polygon test.
///
/// Fails with `DegeneratePolygon` for polygons with fewer than three vertices.
pub fn covers(polygon: &PolygonShape, point: Coord<f64>) -> Result<bool> {
    polygon.ensure_testable()?;
    Ok(polygon.to_polygon().coordinate_position(&point) != CoordPos::Outside)
}

/// Return the id of the first candidate covering `point`, or `None`.
///
/// Candidates are consumed lazily; those after the first match are never
/// inspected, so a degenerate polygon only fails the call if it is reached.
pub fn resolve_parent<'a, Id, I>(point: Coord<f64>, candidates: I) -> Result<Option<Id>>
where
    Id: Copy + Debug,
    I: IntoIterator<Item = (Id, &'a PolygonShape)>,
{
    resolve_parent_with_stats(point, candidates).map(|(id, _)| id)
}

/// Like [`resolve_parent`], also returning the resolution counters.
pub fn resolve_parent_with_stats<'a, Id, I>(
    point: Coord<f64>,
    candidates: I,
) -> Result<(Option<Id>, ResolveStats)>
where
    Id: Copy + Debug,
    I: IntoIterator<Item = (Id, &'a PolygonShape)>,
{
    let mut stats = ResolveStats::default();

    for (id, polygon) in candidates {
        stats.candidates_inspected += 1;
        polygon.ensure_testable()?;

        if let Some(bbox) = polygon.bbox() {
            if !bbox.contains_point(point) {
                stats.bbox_rejected += 1;
                continue;
            }
        }

        stats.exact_tests += 1;
        if polygon.to_polygon().coordinate_position(&point) != CoordPos::Outside {
            tracing::trace!(
                ?id,
                x = point.x,
                y = point.y,
                inspected = stats.candidates_inspected,
                "covering parent found"
            );
            return Ok((Some(id), stats));
        }
    }

    tracing::trace!(
        x = point.x,
        y = point.y,
        inspected = stats.candidates_inspected,
        bbox_rejected = stats.bbox_rejected,
        "no covering parent"
    );
    Ok((None, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpatialError;

    fn square(min: f64, max: f64) -> PolygonShape {
        PolygonShape::from_pairs(&[(min, min), (min, max), (max, max), (max, min)]).unwrap()
    }

    fn at(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_covers_interior_and_outside() {
        let sq = square(0.0, 10.0);
        assert!(covers(&sq, at(5.0, 5.0)).unwrap());
        assert!(!covers(&sq, at(12.0, 5.0)).unwrap());
    }

    #[test]
    fn test_covers_boundary_inclusive() {
        let sq = square(0.0, 10.0);
        assert!(covers(&sq, at(0.0, 5.0)).unwrap());
        assert!(covers(&sq, at(10.0, 10.0)).unwrap());
        assert!(covers(&sq, at(5.0, 0.0)).unwrap());
    }

    #[test]
    fn test_covers_concave() {
        // L shape; (7, 7) lies in the notch.
        let l = PolygonShape::from_pairs(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ])
        .unwrap();
        assert!(covers(&l, at(2.0, 8.0)).unwrap());
        assert!(!covers(&l, at(7.0, 7.0)).unwrap());
    }

    #[test]
    fn test_degenerate_polygon() {
        let line = PolygonShape::from_pairs(&[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        assert_eq!(
            covers(&line, at(5.0, 5.0)).unwrap_err(),
            SpatialError::DegeneratePolygon { vertices: 2 }
        );
    }

    #[test]
    fn test_resolve_edge_point() {
        let sq = square(0.0, 10.0);
        let parent = resolve_parent(at(10.0, 3.0), [(7u64, &sq)]).unwrap();
        assert_eq!(parent, Some(7));
    }

    #[test]
    fn test_resolve_no_match() {
        let a = square(0.0, 10.0);
        let b = square(20.0, 30.0);
        let parent = resolve_parent(at(15.0, 15.0), [(1u64, &a), (2u64, &b)]).unwrap();
        assert_eq!(parent, None);

        let empty: Vec<(u64, &PolygonShape)> = Vec::new();
        assert_eq!(resolve_parent(at(0.0, 0.0), empty).unwrap(), None);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let big = square(0.0, 100.0);
        let small = square(0.0, 10.0);
        let p = at(5.0, 5.0);

        assert_eq!(
            resolve_parent(p, [(1u64, &big), (2u64, &small)]).unwrap(),
            Some(1)
        );
        assert_eq!(
            resolve_parent(p, [(2u64, &small), (1u64, &big)]).unwrap(),
            Some(2)
        );
    }

    #[test]
    fn test_degenerate_candidate_only_fails_when_reached() {
        let good = square(0.0, 10.0);
        let bad = PolygonShape::from_pairs(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();

        let parent = resolve_parent(at(5.0, 5.0), [(1u64, &good), (2u64, &bad)]).unwrap();
        assert_eq!(parent, Some(1));

        let err = resolve_parent(at(5.0, 5.0), [(2u64, &bad), (1u64, &good)]).unwrap_err();
        assert_eq!(err, SpatialError::DegeneratePolygon { vertices: 2 });
    }

    #[test]
    fn test_stats_count_bbox_rejections() {
        let far = square(50.0, 60.0);
        let near = square(0.0, 10.0);
        let (parent, stats) =
            resolve_parent_with_stats(at(1.0, 1.0), [(1u64, &far), (2u64, &near)]).unwrap();
        assert_eq!(parent, Some(2));
        assert_eq!(
            stats,
            ResolveStats {
                candidates_inspected: 2,
                bbox_rejected: 1,
                exact_tests: 1,
            }
        );
    }
}
