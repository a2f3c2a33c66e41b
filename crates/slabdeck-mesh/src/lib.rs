#![warn(missing_docs)]

//! Triangle meshes and scene containers for slabdeck.
//!
//! [`TriangleMesh`] is the single mesh representation shared by the solid
//! builder, the section slicer and the exporters: flat `f32` positions,
//! `u32` triangle indices and optional per-vertex RGBA colors.
//!
//! A [`Scene`] groups named meshes and tags each with a [`NodeRole`] so that
//! decoration (axes, origin dot, section planes) can be told apart from the
//! deck itself.

pub mod markers;
pub mod primitives;
pub mod scene;

pub use markers::{create_axes, create_origin_dot, marker_scene, MarkerSettings};
pub use primitives::{axis_box, cylinder, hexahedron, icosphere, HEXAHEDRON_FACES};
pub use scene::{NodeRole, Scene, SceneNode};

use slabdeck_math::{Point3, Transform};

/// RGBA color with 8-bit channels.
pub type Rgba = [u8; 4];

/// Opaque white, used to pad uncolored vertices when meshes are merged.
pub const WHITE: Rgba = [255, 255, 255, 255];

/// Opaque black.
pub const BLACK: Rgba = [0, 0, 0, 255];

/// Output triangle mesh for slicing and export.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex colors: `[r0, g0, b0, a0, ...]`. Either empty or
    /// four entries per vertex.
    pub colors: Vec<u8>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when every vertex carries a color.
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty() && self.colors.len() == self.num_vertices() * 4
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, p: &Point3) -> u32 {
        let index = self.num_vertices() as u32;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        index
    }

    /// Append a triangle by vertex indices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Vertex `i` as a double-precision point.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[i * 3] as f64,
            self.vertices[i * 3 + 1] as f64,
            self.vertices[i * 3 + 2] as f64,
        )
    }

    /// Iterate over triangles as corner triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertex(tri[0] as usize),
                self.vertex(tri[1] as usize),
                self.vertex(tri[2] as usize),
            ]
        })
    }

    /// Paint every vertex with one color.
    pub fn paint(&mut self, color: Rgba) {
        self.colors = color.repeat(self.num_vertices());
    }

    /// Builder-style [`paint`](Self::paint).
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.paint(color);
        self
    }

    /// Merge another mesh into this one.
    ///
    /// When only one side is colored the other side's vertices are padded
    /// with [`WHITE`] so the color buffer stays aligned with the positions.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        if self.has_colors() || other.has_colors() {
            if !self.has_colors() {
                self.colors = WHITE.repeat(self.num_vertices());
            }
            if other.has_colors() {
                self.colors.extend_from_slice(&other.colors);
            } else {
                self.colors.extend(WHITE.repeat(other.num_vertices()));
            }
        }
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Return a copy with every vertex mapped through `transform`.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for i in 0..self.num_vertices() {
            let p = transform.apply_point(&self.vertex(i));
            vertices.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
        Self {
            vertices,
            indices: self.indices.clone(),
            colors: self.colors.clone(),
        }
    }

    /// Axis-aligned bounds of the vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut bounds = Aabb::empty();
        for i in 0..self.num_vertices() {
            bounds.include(&self.vertex(i));
        }
        Some(bounds)
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// An inverted box that any included point replaces.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Grow to include `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow to include another box.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Check if the box contains at least one point.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}
