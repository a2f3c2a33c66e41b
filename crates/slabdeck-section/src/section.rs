//! Plane-mesh intersection, polyline chaining and 2D projection.

use std::collections::HashMap;

use slabdeck_math::{Point3, Tolerance, Vec3};
use slabdeck_mesh::{NodeRole, Scene, TriangleMesh};
use slabdeck_model::Solid;
use tracing::{debug, debug_span, warn};

use crate::error::{Result, SectionError};
use crate::types::{Point2D, SectionCurve, SectionEntity, SectionPlane, SectionScene};

// ============================================================================
// Plane-Triangle Intersection
// ============================================================================

/// Intersect a single triangle with a plane.
///
/// Returns 0, 1, or 2 intersection points. Vertices on the plane count as
/// intersection points. A triangle lying in the plane yields none; its
/// boundary edges come from the neighbouring faces that leave the plane.
fn intersect_triangle_with_plane(
    corners: [Point3; 3],
    plane_origin: &Point3,
    plane_normal: &Vec3,
    tol: f64,
) -> Vec<Point3> {
    let d = corners.map(|v| plane_normal.dot(&(v - plane_origin)));
    if d.iter().all(|dist| dist.abs() < tol) {
        return Vec::new();
    }

    let mut points: Vec<Point3> = Vec::with_capacity(3);
    let push_unique = |p: Point3, points: &mut Vec<Point3>| {
        if !points.iter().any(|q| (*q - p).norm() < tol) {
            points.push(p);
        }
    };

    for (v, dist) in corners.iter().zip(d) {
        if dist.abs() < tol {
            push_unique(*v, &mut points);
        }
    }

    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        let straddles = (d[a] > tol && d[b] < -tol) || (d[a] < -tol && d[b] > tol);
        if straddles {
            let t = d[a] / (d[a] - d[b]);
            push_unique(corners[a] + (corners[b] - corners[a]) * t, &mut points);
        }
    }

    points.truncate(2);
    points
}

/// Intersect a mesh with a plane, returning 3D line segments.
pub fn intersect_mesh_with_plane(
    mesh: &TriangleMesh,
    plane_origin: Point3,
    plane_normal: Vec3,
) -> Vec<(Point3, Point3)> {
    let normal = plane_normal.normalize();
    let tol = Tolerance::DEFAULT.linear;

    mesh.triangles()
        .filter_map(|tri| {
            let pts = intersect_triangle_with_plane(tri, &plane_origin, &normal, tol);
            (pts.len() == 2).then(|| (pts[0], pts[1]))
        })
        .collect()
}

// ============================================================================
// Segment Chaining
// ============================================================================

type PointKey = (i64, i64, i64);

/// Key for endpoint lookup with tolerance-based hashing.
fn point_key(p: &Point3, tolerance: f64) -> PointKey {
    let scale = 1.0 / tolerance;
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    )
}

/// Endpoint index: key -> (segment index, matched at segment end).
struct Adjacency<'a> {
    segments: &'a [(Point3, Point3)],
    by_key: HashMap<PointKey, Vec<(usize, bool)>>,
    used: Vec<bool>,
    tolerance: f64,
}

impl<'a> Adjacency<'a> {
    fn new(segments: &'a [(Point3, Point3)], tolerance: f64) -> Self {
        let mut by_key: HashMap<PointKey, Vec<(usize, bool)>> = HashMap::new();
        for (i, (p0, p1)) in segments.iter().enumerate() {
            by_key.entry(point_key(p0, tolerance)).or_default().push((i, false));
            by_key.entry(point_key(p1, tolerance)).or_default().push((i, true));
        }
        Self {
            segments,
            by_key,
            used: vec![false; segments.len()],
            tolerance,
        }
    }

    /// Take an unused segment touching `at` and return its far endpoint.
    fn take_next(&mut self, at: &Point3) -> Option<Point3> {
        let neighbors = self.by_key.get(&point_key(at, self.tolerance))?;
        let &(index, is_end) = neighbors.iter().find(|(i, _)| !self.used[*i])?;
        self.used[index] = true;
        let (s0, s1) = self.segments[index];
        Some(if is_end { s0 } else { s1 })
    }
}

/// Chain individual segments into continuous polylines.
///
/// Endpoints closer than `tolerance` (after quantization) are joined. Each
/// chain is grown forward from its seed segment, then backward.
pub fn chain_segments(segments: &[(Point3, Point3)], tolerance: f64) -> Vec<SectionEntity> {
    let mut adjacency = Adjacency::new(segments, tolerance);
    let mut entities = Vec::new();

    for (start, &(p0, p1)) in segments.iter().enumerate() {
        if adjacency.used[start] {
            continue;
        }
        adjacency.used[start] = true;

        let mut forward = vec![p0, p1];
        let mut current = p1;
        while let Some(next) = adjacency.take_next(&current) {
            forward.push(next);
            current = next;
        }

        let mut backward = Vec::new();
        let mut current = p0;
        while let Some(next) = adjacency.take_next(&current) {
            backward.push(next);
            current = next;
        }

        backward.reverse();
        backward.extend(forward);
        let mut chain = backward;

        let is_closed = chain.len() >= 3
            && matches!(
                (chain.first(), chain.last()),
                (Some(a), Some(b)) if (a - b).norm() < tolerance
            );
        if is_closed {
            chain.pop();
        }

        entities.push(SectionEntity::new(chain, is_closed));
    }

    entities
}

// ============================================================================
// 2D Projection
// ============================================================================

/// Project entities onto the cutting plane, returning 2D section curves.
///
/// Builds an orthonormal frame on the plane from the normal and up vectors:
/// `right = up × normal`, then up is recomputed as `normal × right`.
pub fn project_to_section_plane(
    entities: &[SectionEntity],
    plane: &SectionPlane,
) -> Vec<SectionCurve> {
    let normal = plane.normal_vec().normalize();
    let up = plane.up_vec().normalize();
    let origin = plane.origin_point();

    let right = up.cross(&normal).normalize();
    let actual_up = normal.cross(&right);

    let project = |p: &Point3| -> Point2D {
        let d = *p - origin;
        Point2D::new(d.dot(&right), d.dot(&actual_up))
    };

    entities
        .iter()
        .map(|e| SectionCurve::new(e.points.iter().map(&project).collect(), e.is_closed))
        .collect()
}

// ============================================================================
// Entry Points
// ============================================================================

fn checked_normal(normal: Vec3) -> Result<Vec3> {
    let norm = normal.norm();
    if !norm.is_finite() || norm < Tolerance::DEFAULT.linear {
        return Err(SectionError::DegeneratePlane([normal.x, normal.y, normal.z]));
    }
    Ok(normal / norm)
}

/// Cut a deck mesh with a plane and chain the pieces.
pub fn section_mesh(
    mesh: &TriangleMesh,
    plane_origin: Point3,
    plane_normal: Vec3,
) -> Result<Vec<SectionEntity>> {
    let normal = checked_normal(plane_normal)?;
    let segments = intersect_mesh_with_plane(mesh, plane_origin, normal);
    if segments.is_empty() {
        return Ok(Vec::new());
    }
    Ok(chain_segments(&segments, Tolerance::DEFAULT.chain))
}

/// Cut the deck of `solid` with the plane through `plane_origin`.
///
/// Only the deck mesh is sliced; markers and section-plane boxes are never
/// seen. A plane that misses the deck gives an empty list.
pub fn slice(
    solid: &Solid,
    plane_origin: Point3,
    plane_normal: Vec3,
) -> Result<Vec<SectionEntity>> {
    let _span = debug_span!("slice", origin = ?plane_origin.coords.as_slice()).entered();

    let entities = section_mesh(solid.deck(), plane_origin, plane_normal)?;
    if entities.is_empty() {
        warn!(
            normal = ?plane_normal.as_slice(),
            "section plane does not intersect the deck"
        );
    } else {
        debug!(
            entities = entities.len(),
            closed = entities.iter().filter(|e| e.is_closed).count(),
            "sliced deck"
        );
    }
    Ok(entities)
}

/// Slice with a [`SectionPlane`] and attach the solid's marker nodes.
pub fn section_solid(solid: &Solid, plane: &SectionPlane) -> Result<SectionScene> {
    let entities = slice(solid, plane.origin_point(), plane.normal_vec())?;

    let mut decoration = Scene::new("section_markers");
    for node in solid.scene.nodes_with_role(NodeRole::Marker) {
        decoration.nodes.push(node.clone());
    }

    Ok(SectionScene {
        plane: plane.clone(),
        entities,
        decoration,
    })
}
