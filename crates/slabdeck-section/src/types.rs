//! Core types for sectioning.

use serde::{Deserialize, Serialize};
use slabdeck_math::{Axis, Point2, Point3, Vec3};
use slabdeck_mesh::Scene;

/// A 2D point for serializable section output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for Point2D {
    fn from(p: Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// Defines a cutting plane.
///
/// Uses array representation for serialization compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPlane {
    /// Point on the cutting plane [x, y, z].
    pub origin: [f64; 3],
    /// Plane normal vector [x, y, z].
    pub normal: [f64; 3],
    /// Up direction for 2D projection orientation [x, y, z].
    pub up: [f64; 3],
}

impl SectionPlane {
    /// Plan cut at height `z` (normal +Z).
    pub fn horizontal(z: f64) -> Self {
        Self {
            origin: [0.0, 0.0, z],
            normal: [0.0, 0.0, 1.0],
            up: [0.0, 1.0, 0.0],
        }
    }

    /// Cut along the bridge at transverse offset `y` (normal +Y).
    pub fn longitudinal(y: f64) -> Self {
        Self {
            origin: [0.0, y, 0.0],
            normal: [0.0, 1.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }

    /// Cut across the bridge at chainage `x` (normal +X).
    pub fn cross(x: f64) -> Self {
        Self {
            origin: [x, 0.0, 0.0],
            normal: [1.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }

    /// The canonical plane perpendicular to `axis` at `offset`.
    pub fn perpendicular_to(axis: Axis, offset: f64) -> Self {
        match axis {
            Axis::X => Self::cross(offset),
            Axis::Y => Self::longitudinal(offset),
            Axis::Z => Self::horizontal(offset),
        }
    }

    /// Get origin as Point3.
    pub fn origin_point(&self) -> Point3 {
        Point3::new(self.origin[0], self.origin[1], self.origin[2])
    }

    /// Get normal as Vec3.
    pub fn normal_vec(&self) -> Vec3 {
        Vec3::new(self.normal[0], self.normal[1], self.normal[2])
    }

    /// Get up as Vec3.
    pub fn up_vec(&self) -> Vec3 {
        Vec3::new(self.up[0], self.up[1], self.up[2])
    }
}

/// One connected polyline where the plane cuts the deck.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEntity {
    /// Ordered vertices. A closed entity does not repeat its first point.
    pub points: Vec<Point3>,
    /// Whether the polyline forms a loop.
    pub is_closed: bool,
}

impl SectionEntity {
    /// Create a new entity.
    pub fn new(points: Vec<Point3>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }

    /// Consecutive point pairs, including the closing pair of a loop.
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        let closing = match (self.is_closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 1 => Some((*last, *first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the entity has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A continuous polyline in plane coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCurve {
    /// Ordered vertices of the polyline in 2D.
    pub points: Vec<Point2D>,
    /// Whether it forms a closed loop.
    pub is_closed: bool,
}

impl SectionCurve {
    /// Create a new section curve.
    pub fn new(points: Vec<Point2D>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }
}

/// Section result together with the decoration drawn alongside it.
///
/// `entities` is the only numeric output; `decoration` carries the marker
/// nodes for display and must not feed ranges or counts.
#[derive(Debug, Clone)]
pub struct SectionScene {
    /// Plane the section was taken with.
    pub plane: SectionPlane,
    /// Cut polylines.
    pub entities: Vec<SectionEntity>,
    /// Marker geometry shown with the section.
    pub decoration: Scene,
}

impl SectionScene {
    /// True when the plane missed the deck.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Every entity vertex, in entity order.
    pub fn vertices(&self) -> impl Iterator<Item = &Point3> {
        self.entities.iter().flat_map(|e| e.points.iter())
    }

    /// Number of closed entities.
    pub fn num_closed(&self) -> usize {
        self.entities.iter().filter(|e| e.is_closed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut bb = BoundingBox2D::empty();
        assert!(!bb.is_valid());

        bb.include_point(Point2D::new(0.0, 0.0));
        bb.include_point(Point2D::new(10.0, 5.0));

        assert!(bb.is_valid());
        assert_eq!((bb.min_x, bb.min_y), (0.0, 0.0));
        assert_eq!((bb.max_x, bb.max_y), (10.0, 5.0));
    }

    #[test]
    fn test_canonical_planes() {
        let h = SectionPlane::horizontal(-1.0);
        assert_eq!(h.normal, [0.0, 0.0, 1.0]);
        assert!((h.origin[2] + 1.0).abs() < 1e-12);

        let l = SectionPlane::longitudinal(3.0);
        assert_eq!(l.normal, [0.0, 1.0, 0.0]);
        assert!((l.origin[1] - 3.0).abs() < 1e-12);

        let c = SectionPlane::cross(5.0);
        assert_eq!(c.normal, [1.0, 0.0, 0.0]);
        assert_eq!(SectionPlane::perpendicular_to(Axis::X, 5.0), c);
    }

    #[test]
    fn test_entity_segments() {
        let square = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let open = SectionEntity::new(square.clone(), false);
        assert_eq!(open.segments().count(), 3);

        let closed = SectionEntity::new(square, true);
        let segments: Vec<_> = closed.segments().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].1, Point3::origin());
    }
}
