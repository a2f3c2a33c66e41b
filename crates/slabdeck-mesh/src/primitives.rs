//! Mesh primitives: hexahedra for deck zones and planes, cylinders and
//! icospheres for markers.

use std::collections::HashMap;
use std::f64::consts::PI;

use slabdeck_math::{Point3, Vec3};

use crate::TriangleMesh;

/// Triangle topology shared by every hexahedron.
///
/// Corners 0-3 form the bottom ring and 4-7 the top ring; each ring runs
/// (start, low y), (end, low y), (end, high y), (start, high y). Two
/// triangles per face, wound so normals point out of the box.
#[rustfmt::skip]
pub const HEXAHEDRON_FACES: [[u32; 3]; 12] = [
    [0, 2, 1], [0, 3, 2], // bottom
    [4, 5, 6], [4, 6, 7], // top
    [0, 1, 5], [0, 5, 4], // low y side
    [3, 6, 2], [3, 7, 6], // high y side
    [0, 7, 3], [0, 4, 7], // start
    [1, 2, 6], [1, 6, 5], // end
];

/// Triangulate eight corners with [`HEXAHEDRON_FACES`].
///
/// Corners are used as given; an irregular (tapered or skewed) box is fine
/// as long as each face stays planar enough to read.
pub fn hexahedron(corners: &[Point3; 8]) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    for corner in corners {
        mesh.push_vertex(corner);
    }
    for [a, b, c] in HEXAHEDRON_FACES {
        mesh.push_triangle(a, b, c);
    }
    mesh
}

/// Axis-aligned box with the given extents, centered at `center`.
pub fn axis_box(extents: Vec3, center: Point3) -> TriangleMesh {
    let h = extents / 2.0;
    let (x0, x1) = (center.x - h.x, center.x + h.x);
    let (y0, y1) = (center.y - h.y, center.y + h.y);
    let (z0, z1) = (center.z - h.z, center.z + h.z);
    hexahedron(&[
        Point3::new(x0, y0, z0),
        Point3::new(x1, y0, z0),
        Point3::new(x1, y1, z0),
        Point3::new(x0, y1, z0),
        Point3::new(x0, y0, z1),
        Point3::new(x1, y0, z1),
        Point3::new(x1, y1, z1),
        Point3::new(x0, y1, z1),
    ])
}

/// Closed cylinder along Z, centered at the origin.
///
/// `sections` is the number of facets around the circumference (min 3).
/// Produces `4 * sections` triangles: two per side facet plus one per facet
/// in each cap.
pub fn cylinder(radius: f64, height: f64, sections: u32) -> TriangleMesh {
    let n = sections.max(3);
    let half = height / 2.0;
    let mut mesh = TriangleMesh::new();

    // Rings: bottom vertices 0..n, top vertices n..2n
    for z in [-half, half] {
        for i in 0..n {
            let u = 2.0 * PI * (i as f64 / n as f64);
            mesh.push_vertex(&Point3::new(radius * u.cos(), radius * u.sin(), z));
        }
    }
    let bottom_center = mesh.push_vertex(&Point3::new(0.0, 0.0, -half));
    let top_center = mesh.push_vertex(&Point3::new(0.0, 0.0, half));

    for i in 0..n {
        let j = (i + 1) % n;
        let (b_i, b_j) = (i, j);
        let (t_i, t_j) = (n + i, n + j);
        mesh.push_triangle(b_i, b_j, t_j);
        mesh.push_triangle(b_i, t_j, t_i);
        mesh.push_triangle(top_center, t_i, t_j);
        mesh.push_triangle(bottom_center, b_j, b_i);
    }

    mesh
}

/// Sphere centered at the origin, built by subdividing an icosahedron.
///
/// Each subdivision level quadruples the face count, starting from 20.
pub fn icosphere(radius: f64, subdivisions: u32) -> TriangleMesh {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;

    #[rustfmt::skip]
    let mut points: Vec<Vec3> = [
        (-1.0, t, 0.0), (1.0, t, 0.0), (-1.0, -t, 0.0), (1.0, -t, 0.0),
        (0.0, -1.0, t), (0.0, 1.0, t), (0.0, -1.0, -t), (0.0, 1.0, -t),
        (t, 0.0, -1.0), (t, 0.0, 1.0), (-t, 0.0, -1.0), (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    #[rustfmt::skip]
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, points: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let m = (points[a as usize] + points[b as usize]).normalize();
                points.push(m);
                (points.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut points);
            let bc = midpoint(b, c, &mut points);
            let ca = midpoint(c, a, &mut points);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    let mut mesh = TriangleMesh::new();
    for p in &points {
        mesh.push_vertex(&Point3::from(p * radius));
    }
    for [a, b, c] in faces {
        mesh.push_triangle(a, b, c);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Signed volume via the divergence theorem; positive for outward winding.
    fn signed_volume(mesh: &TriangleMesh) -> f64 {
        mesh.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    #[test]
    fn test_hexahedron_counts() {
        let mesh = axis_box(Vec3::new(2.0, 3.0, 4.0), Point3::origin());
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        assert!((signed_volume(&mesh) - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_axis_box_bounds() {
        let mesh = axis_box(Vec3::new(2.0, 4.0, 0.01), Point3::new(1.0, -2.5, 3.0));
        let b = mesh.bounds().unwrap();
        assert!((b.min.x - 0.0).abs() < 1e-6);
        assert!((b.max.x - 2.0).abs() < 1e-6);
        assert!((b.min.y + 4.5).abs() < 1e-6);
        assert!((b.max.z - 3.005).abs() < 1e-6);
    }

    #[test]
    fn test_hexahedron_is_closed() {
        // Every edge of a closed surface is shared by exactly two triangles.
        let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
        for [a, b, c] in HEXAHEDRON_FACES {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *edges.entry((u.min(v), u.max(v))).or_default() += 1;
            }
        }
        assert!(edges.values().all(|&n| n == 2), "edges: {edges:?}");
    }

    #[test]
    fn test_cylinder_counts_and_volume() {
        let mesh = cylinder(1.0, 2.0, 20);
        assert_eq!(mesh.num_triangles(), 80);
        assert_eq!(mesh.num_vertices(), 42);

        // Inscribed 20-gon prism: 0.5 * n * sin(2pi/n) * h
        let expected = 0.5 * 20.0 * (2.0 * PI / 20.0).sin() * 2.0;
        let volume = signed_volume(&mesh);
        assert!(
            (volume - expected).abs() < 1e-4,
            "volume {volume}, expected {expected}"
        );
    }

    #[test]
    fn test_icosphere_counts() {
        assert_eq!(icosphere(1.0, 0).num_triangles(), 20);
        let mesh = icosphere(0.5, 2);
        assert_eq!(mesh.num_triangles(), 320);
        assert_eq!(mesh.num_vertices(), 162);

        for i in 0..mesh.num_vertices() {
            let r = mesh.vertex(i).coords.norm();
            assert!((r - 0.5).abs() < 1e-6, "vertex {i} at radius {r}");
        }
        assert!(signed_volume(&mesh) > 0.0);
    }
}
