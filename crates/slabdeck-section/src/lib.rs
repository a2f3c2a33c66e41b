#![warn(missing_docs)]

//! Plane sectioning of slab-bridge deck solids.
//!
//! [`slice`] cuts the deck mesh of a [`Solid`](slabdeck_model::Solid) with an
//! infinite plane and chains the cut segments into [`SectionEntity`]
//! polylines. Marker and section-plane nodes are never sliced.
//!
//! # Example
//!
//! ```
//! use slabdeck_math::{Point3, Vec3};
//! use slabdeck_model::{build_solid, default_segments};
//! use slabdeck_section::slice;
//!
//! let solid = build_solid(&default_segments()).unwrap();
//! let entities = slice(&solid, Point3::new(5.0, 0.0, 0.0), Vec3::x()).unwrap();
//! assert!(!entities.is_empty());
//! ```

pub mod error;
pub mod section;
pub mod types;

pub use error::{Result, SectionError};
pub use section::{
    chain_segments, intersect_mesh_with_plane, project_to_section_plane, section_mesh,
    section_solid, slice,
};
pub use types::{
    BoundingBox2D, Point2D, SectionCurve, SectionEntity, SectionPlane, SectionScene,
};
