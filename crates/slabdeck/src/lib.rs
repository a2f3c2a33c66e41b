#![warn(missing_docs)]

//! slabdeck: slab-bridge deck modelling
//!
//! Build a zoned deck solid from per-D-point segments, lay reinforcement
//! bars into it, cut it with planes, draw section, plan and load-zone
//! views, and export the 3D scene as glTF.
//!
//! # Example
//!
//! ```rust,no_run
//! use slabdeck::{build_solid, cross_view, default_segments, export_scene_glb};
//!
//! let segments = default_segments();
//! let solid = build_solid(&segments).unwrap();
//! export_scene_glb(&solid.scene, "deck.glb").unwrap();
//!
//! let plot = cross_view(&segments, 5.0).unwrap();
//! println!("{}", serde_json::to_string_pretty(&plot).unwrap());
//! ```

use thiserror::Error;

pub mod config;
pub mod export;

pub use config::BridgeConfig;
pub use export::{plot_to_json, write_plot_json};
#[cfg(feature = "gltf")]
pub use export::{export_scene_glb, export_scene_gltf, scene_to_glb, scene_to_gltf};

pub use slabdeck_math::{Axis, Point2, Point3, Tolerance, Transform, Vec2, Vec3};
pub use slabdeck_mesh::{
    create_axes, create_origin_dot, marker_scene, Aabb, MarkerSettings, NodeRole, Rgba, Scene,
    SceneNode, TriangleMesh,
};
pub use slabdeck_model::{
    build_solid, build_solid_with, create_rebars, create_section_planes, d_point_positions,
    default_segments, max_width, total_length, validate_segments, ModelError, Reinforcement,
    ReinforcementZone, SectionLocations, Segment, Solid, SolidOptions, Zone, ZoneBox,
    MIN_SEGMENTS,
};
pub use slabdeck_section::{
    section_solid, slice, BoundingBox2D, Point2D, SectionCurve, SectionEntity, SectionError,
    SectionPlane, SectionScene,
};
pub use slabdeck_views::{
    annotate_cross_section, cross_view, horizontal_view, load_zone_plot, longitudinal_view,
    project, to_chart_spec, top_view, validate_load_zone_widths, Annotation, AnnotationStyle,
    AxisRanges, FilledPolygon, LoadZone, LoadZoneGeometry, PlotDescription, ViewError, ViewKind,
    DEFAULT_LABEL_Y_OFFSET,
};

/// Errors returned by slabdeck operations.
#[derive(Error, Debug)]
pub enum DeckError {
    /// Invalid segment data.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Slicing failed.
    #[error(transparent)]
    Section(#[from] SectionError),
    /// View generation failed.
    #[error(transparent)]
    View(#[from] ViewError),
    /// An I/O error occurred while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML input could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// The file extension names no supported format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// A scene could not be exported.
    #[error("export error: {0}")]
    Export(String),
}

/// Result type for slabdeck operations.
pub type Result<T> = std::result::Result<T, DeckError>;
