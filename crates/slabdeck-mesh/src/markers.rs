//! Axes and origin markers.
//!
//! Purely visual reference geometry. Every node produced here has
//! [`NodeRole::Marker`] so slicing and plot ranges never see it.

use serde::{Deserialize, Serialize};
use slabdeck_math::{Axis, Transform};

use crate::{cylinder, icosphere, NodeRole, Rgba, Scene, TriangleMesh, BLACK};

/// Facets around each axis cylinder.
const AXIS_SECTIONS: u32 = 20;

/// Subdivision level of the origin dot.
const DOT_SUBDIVISIONS: u32 = 2;

/// Sizes of the marker geometry added to scenes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Length of each axis cylinder (m).
    pub axis_length: f64,
    /// Radius of each axis cylinder (m).
    pub axis_radius: f64,
    /// Radius of the origin dot (m).
    pub dot_radius: f64,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            axis_length: 5.0,
            axis_radius: 0.05,
            dot_radius: 0.1,
        }
    }
}

fn axis_color(axis: Axis) -> Rgba {
    match axis {
        Axis::X => [255, 0, 0, 255],
        Axis::Y => [0, 255, 0, 255],
        Axis::Z => [0, 0, 255, 255],
    }
}

/// Three colored cylinders: red X, green Y, blue Z.
///
/// Each cylinder is `length` long and `radius` thick, sits on its axis line
/// and runs from the origin towards the positive end of the axis.
pub fn create_axes(length: f64, radius: f64) -> Scene {
    let mut scene = Scene::new("axes");
    let base = cylinder(radius, length, AXIS_SECTIONS);
    let lift = Transform::translation(0.0, 0.0, length / 2.0);

    for axis in Axis::ALL {
        let placement = Transform::z_onto(axis).then(&lift);
        let mesh = base.transformed(&placement).with_color(axis_color(axis));
        scene.add(
            format!("{}_axis", axis.to_string().to_lowercase()),
            NodeRole::Marker,
            mesh,
        );
    }
    scene
}

/// A black sphere at the origin.
pub fn create_origin_dot(radius: f64) -> TriangleMesh {
    icosphere(radius, DOT_SUBDIVISIONS).with_color(BLACK)
}

/// Axes plus origin dot, sized by `settings`.
pub fn marker_scene(settings: &MarkerSettings) -> Scene {
    let mut scene = create_axes(settings.axis_length, settings.axis_radius);
    scene.add(
        "origin",
        NodeRole::Marker,
        create_origin_dot(settings.dot_radius),
    );
    scene
}
