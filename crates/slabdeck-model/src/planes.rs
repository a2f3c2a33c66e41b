//! Translucent boxes showing where the three canonical sections are taken.

use serde::{Deserialize, Serialize};
use slabdeck_math::{Point3, Vec3};
use slabdeck_mesh::{axis_box, NodeRole, Rgba, Scene};

use crate::error::Result;
use crate::segment::{total_length, validate_segments, Segment};

/// Color of the section-plane boxes.
pub const PLANE_COLOR: Rgba = [128, 128, 128, 150];

/// Thickness of a section-plane box along its normal (m).
pub const PLANE_THICKNESS: f64 = 0.01;

/// Margin added around the deck on every in-plane axis (m).
pub const PLANE_PADDING: f64 = 5.0;

/// Offsets at which the three canonical sections are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLocations {
    /// Z of the horizontal section.
    pub horizontal: f64,
    /// Y of the longitudinal section.
    pub longitudinal: f64,
    /// X of the cross section.
    pub cross: f64,
}

impl Default for SectionLocations {
    fn default() -> Self {
        Self {
            horizontal: -1.0,
            longitudinal: 0.0,
            cross: 5.0,
        }
    }
}

/// Three thin grey boxes, one per section, sized to enclose the deck.
///
/// The width used is the sum of the largest zone widths, not the widest
/// single D-point, so the boxes always cover every span.
pub fn create_section_planes(segments: &[Segment], locations: &SectionLocations) -> Result<Scene> {
    validate_segments(segments)?;

    let length = total_length(segments);
    let max_of = |f: fn(&Segment) -> f64| segments.iter().map(f).fold(0.0, f64::max);
    let width = max_of(|s| s.zone1_width) + max_of(|s| s.zone2_width) + max_of(|s| s.zone3_width);
    let height = max_of(|s| s.thickness_inner);
    let pad = PLANE_PADDING;

    let planes = [
        (
            "horizontal_plane",
            Vec3::new(length + pad, width + pad, PLANE_THICKNESS),
            Point3::new(length / 2.0, -pad / 2.0, locations.horizontal),
        ),
        (
            "longitudinal_plane",
            Vec3::new(length + pad, PLANE_THICKNESS, height + pad),
            Point3::new(length / 2.0, locations.longitudinal, -pad / 2.0),
        ),
        (
            "cross_plane",
            Vec3::new(PLANE_THICKNESS, width + pad, height + pad),
            Point3::new(locations.cross, -pad / 2.0, -pad / 2.0),
        ),
    ];

    let mut scene = Scene::new("section_planes");
    for (name, extents, center) in planes {
        scene.add(
            name,
            NodeRole::SectionPlane,
            axis_box(extents, center).with_color(PLANE_COLOR),
        );
    }
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::default_segments;

    #[test]
    fn test_three_planes() {
        let scene = create_section_planes(&default_segments(), &SectionLocations::default()).unwrap();
        assert_eq!(scene.len(), 3);
        assert!(scene
            .nodes
            .iter()
            .all(|n| n.role == NodeRole::SectionPlane));
        assert_eq!(scene.num_triangles(NodeRole::SectionPlane), 36);
        assert_eq!(&scene.nodes[0].mesh.colors[0..4], &PLANE_COLOR);
    }

    #[test]
    fn test_plane_placement() {
        let locations = SectionLocations {
            horizontal: -0.5,
            longitudinal: 3.0,
            cross: 7.0,
        };
        let scene = create_section_planes(&default_segments(), &locations).unwrap();

        let h = scene.node("horizontal_plane").unwrap().mesh.bounds().unwrap();
        assert!((h.min.x + 2.5).abs() < 1e-5);
        assert!((h.max.x - 12.5).abs() < 1e-5);
        assert!((h.min.y + 20.0).abs() < 1e-5);
        assert!((h.max.y - 15.0).abs() < 1e-5);
        assert!(((h.min.z + h.max.z) / 2.0 + 0.5).abs() < 1e-5);

        let l = scene.node("longitudinal_plane").unwrap().mesh.bounds().unwrap();
        assert!(((l.min.y + l.max.y) / 2.0 - 3.0).abs() < 1e-5);
        assert!((l.max.z - l.min.z - 8.0).abs() < 1e-5);

        let c = scene.node("cross_plane").unwrap().mesh.bounds().unwrap();
        assert!(((c.min.x + c.max.x) / 2.0 - 7.0).abs() < 1e-5);
        assert!((c.max.x - c.min.x - PLANE_THICKNESS).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_segments_rejected() {
        assert!(create_section_planes(&default_segments()[..1], &SectionLocations::default()).is_err());
    }
}
