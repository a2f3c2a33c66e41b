//! Section views: slice the deck with a canonical plane and annotate the cut.

use serde::{Deserialize, Serialize};
use slabdeck_math::Axis;
use slabdeck_model::{build_solid_with, Segment, Solid, SolidOptions, Zone};
use slabdeck_section::{slice, BoundingBox2D, SectionEntity, SectionPlane};
use tracing::{debug, debug_span, warn};

use crate::error::Result;
use crate::plot::{AnnotationStyle, AxisRanges, PlotDescription, XAnchor, YAnchor, RANGE_PADDING};

/// Cross sections are kept this far inside the last D-point so the plane
/// never coincides with the deck's end face.
const CROSS_END_MARGIN: f64 = 1e-6;

/// The three canonical section views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Plan cut at a height (drops Z).
    Horizontal,
    /// Cut along the bridge at a transverse offset (drops Y).
    Longitudinal,
    /// Cut across the bridge at a chainage (drops X).
    Cross,
}

impl ViewKind {
    /// The axis perpendicular to the cut, i.e. the coordinate dropped.
    pub fn drop_axis(self) -> Axis {
        match self {
            ViewKind::Horizontal => Axis::Z,
            ViewKind::Longitudinal => Axis::Y,
            ViewKind::Cross => Axis::X,
        }
    }

    /// Plot title.
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Horizontal => "Horizontale doorsnede (Horizontal Section)",
            ViewKind::Longitudinal => "Langsdoorsnede (Longitudinal Section)",
            ViewKind::Cross => "Dwarsdoorsnede (Cross Section)",
        }
    }

    /// Horizontal and vertical axis titles.
    pub fn axis_titles(self) -> (&'static str, &'static str) {
        match self {
            ViewKind::Horizontal => ("X-as - Lengte [m]", "Y-as - Breedte [m]"),
            ViewKind::Longitudinal => ("X-as - Lengte [m]", "Z-as - Hoogte [m]"),
            ViewKind::Cross => ("Y-as - Breedte [m]", "Z-as - Hoogte [m]"),
        }
    }
}

impl From<Axis> for ViewKind {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => ViewKind::Cross,
            Axis::Y => ViewKind::Longitudinal,
            Axis::Z => ViewKind::Horizontal,
        }
    }
}

/// Build the deck, cut it perpendicular to `drop_axis` at `offset` and
/// return the annotated view.
///
/// An empty cut is not an error: the plot then has no lines and no
/// annotations, and its ranges cover the deck extent.
pub fn project(segments: &[Segment], offset: f64, drop_axis: Axis) -> Result<PlotDescription> {
    let kind = ViewKind::from(drop_axis);
    let _span = debug_span!("project", view = ?kind, offset).entered();

    let solid = build_solid_with(segments, &SolidOptions::bare())?;
    let offset = match kind {
        ViewKind::Cross => {
            let length = solid.total_length();
            offset.clamp(0.0, (length - CROSS_END_MARGIN).max(length / 2.0))
        }
        _ => offset,
    };

    let plane = SectionPlane::perpendicular_to(drop_axis, offset);
    let entities = slice(&solid, plane.origin_point(), plane.normal_vec())?;

    let (mut plot, extent) = outline(kind, &entities);
    if entities.is_empty() {
        warn!(view = ?kind, offset, "empty section, falling back to deck extent");
        plot.axis_ranges = deck_ranges(&solid, drop_axis);
        return Ok(plot);
    }

    match kind {
        ViewKind::Horizontal => annotate_horizontal(&mut plot, segments, &solid, offset, &extent),
        ViewKind::Longitudinal => {
            annotate_longitudinal(&mut plot, segments, &solid, offset, &extent)
        }
        ViewKind::Cross => {}
    }

    debug!(
        lines = plot.line_segments.len(),
        annotations = plot.annotations.len(),
        "projected section"
    );
    Ok(plot)
}

/// Plan cut at height `z`.
pub fn horizontal_view(segments: &[Segment], z: f64) -> Result<PlotDescription> {
    project(segments, z, Axis::Z)
}

/// Cut along the bridge at transverse offset `y`.
pub fn longitudinal_view(segments: &[Segment], y: f64) -> Result<PlotDescription> {
    project(segments, y, Axis::Y)
}

/// Cut across the bridge at chainage `x`, clamped onto the deck.
pub fn cross_view(segments: &[Segment], x: f64) -> Result<PlotDescription> {
    project(segments, x, Axis::X)
}

/// Black polylines for every entity plus the padded vertex extent.
fn outline(kind: ViewKind, entities: &[SectionEntity]) -> (PlotDescription, BoundingBox2D) {
    let axis = kind.drop_axis();
    let (x_title, y_title) = kind.axis_titles();
    let mut plot = PlotDescription::new(kind.title(), x_title, y_title);
    let mut extent = BoundingBox2D::empty();

    for entity in entities {
        for p in &entity.points {
            extent.include_point(axis.drop_from(p).into());
        }
        for (a, b) in entity.segments() {
            plot.add_line(axis.drop_from(&a).into(), axis.drop_from(&b).into());
        }
    }

    if extent.is_valid() {
        plot.axis_ranges = AxisRanges::padded(&extent, RANGE_PADDING);
    }
    (plot, extent)
}

fn deck_ranges(solid: &Solid, axis: Axis) -> AxisRanges {
    let mut extent = BoundingBox2D::empty();
    if let Some(bounds) = solid.bounds() {
        extent.include_point(axis.drop_from(&bounds.min).into());
        extent.include_point(axis.drop_from(&bounds.max).into());
    }
    if extent.is_valid() {
        AxisRanges::padded(&extent, RANGE_PADDING)
    } else {
        AxisRanges::default()
    }
}

fn d_label_style() -> AnnotationStyle {
    AnnotationStyle::new(15, "black").anchored(XAnchor::Center, YAnchor::Bottom)
}

fn length_style() -> AnnotationStyle {
    AnnotationStyle::new(12, "red").anchored(XAnchor::Center, YAnchor::Top)
}

/// Midpoint between D-point `gap - 1` and D-point `gap`.
fn gap_center(positions: &[f64], gap: usize) -> f64 {
    (positions[gap - 1] + positions[gap]) / 2.0
}

fn annotate_horizontal(
    plot: &mut PlotDescription,
    segments: &[Segment],
    solid: &Solid,
    offset: f64,
    extent: &BoundingBox2D,
) {
    // zone 2 sits above z = 0; a cut at or above it misses zones 1 and 3
    let only_zone2 = offset >= 0.0;
    let visible: &[Zone] = if only_zone2 { &[Zone::Two] } else { &Zone::ALL };
    let positions = &solid.positions;

    for (i, &x) in positions.iter().enumerate() {
        plot.annotate(format!("D-{}", i + 1), x, extent.max_y + 0.5, d_label_style());
    }

    for gap in 1..positions.len() {
        let start = &segments[gap - 1];
        let center_x = gap_center(positions, gap);
        for zone in visible {
            plot.annotate(
                format!("Z{zone}-{gap}"),
                center_x,
                zone.center_y(start),
                AnnotationStyle::new(15, "black"),
            );
        }
        plot.annotate(
            format!("l = {}m", segments[gap].distance_to_previous),
            center_x,
            extent.min_y - 1.0,
            length_style(),
        );
    }

    let width_style = AnnotationStyle::new(12, "green").rotated(-90.0);
    for (segment, &x) in segments.iter().zip(positions) {
        for zone in visible {
            plot.annotate(
                format!("b = {}m", zone.width(segment)),
                x - 1.0,
                zone.center_y(segment),
                width_style.clone(),
            );
        }
    }
}

/// Zone hit by a longitudinal cut. Only the first D-point is consulted.
fn longitudinal_zone(segments: &[Segment], offset: f64) -> Zone {
    let half = segments[0].zone2_width / 2.0;
    if offset > half {
        Zone::One
    } else if offset < -half {
        Zone::Three
    } else {
        Zone::Two
    }
}

fn annotate_longitudinal(
    plot: &mut PlotDescription,
    segments: &[Segment],
    solid: &Solid,
    offset: f64,
    extent: &BoundingBox2D,
) {
    let zone = longitudinal_zone(segments, offset);
    let raised = extent.max_y > 0.0;
    let positions = &solid.positions;

    // (height, vertical center) per D-point
    let heights: Vec<(f64, f64)> = segments
        .iter()
        .map(|s| {
            if raised {
                let extra = s.thickness_inner - s.thickness_outer;
                (s.thickness_inner, (-s.thickness_outer + extra) / 2.0)
            } else {
                (s.thickness_outer, -s.thickness_outer / 2.0)
            }
        })
        .collect();

    for (i, &x) in positions.iter().enumerate() {
        plot.annotate(format!("D-{}", i + 1), x, extent.max_y + 0.5, d_label_style());
    }

    for gap in 1..positions.len() {
        let center_x = gap_center(positions, gap);
        plot.annotate(
            format!("Z{zone}-{gap}"),
            center_x,
            heights[gap].1,
            d_label_style(),
        );
        plot.annotate(
            format!("l = {}m", segments[gap].distance_to_previous),
            center_x,
            extent.min_y - 1.0,
            length_style(),
        );
    }

    let height_style = AnnotationStyle::new(12, "blue")
        .rotated(-90.0)
        .anchored(XAnchor::Right, YAnchor::Middle);
    for (&(h, center), &x) in heights.iter().zip(positions) {
        plot.annotate(format!("h = {h}m"), x - 0.5, center, height_style.clone());
    }
}

/// Add zone, width and height labels to a cross view.
///
/// Dimensions come from the first D-point at or beyond `offset`
/// (D-point 0 when the offset lies past the deck). Labels are numbered
/// with that D-point's 0-based index.
pub fn annotate_cross_section(plot: &mut PlotDescription, segments: &[Segment], offset: f64) {
    let positions = slabdeck_model::d_point_positions(segments);
    let index = positions.iter().position(|&x| offset <= x).unwrap_or(0);
    let Some(segment) = segments.get(index) else {
        return;
    };

    let bounds = plot.geometry_bounds();
    let min_z = if bounds.is_valid() {
        bounds.min_y
    } else {
        plot.axis_ranges.y[0] + RANGE_PADDING
    };

    let label_style = AnnotationStyle::new(12, "black");
    let width_style = AnnotationStyle::new(12, "green");
    let height_style = AnnotationStyle::new(12, "blue")
        .rotated(-90.0)
        .anchored(XAnchor::Right, YAnchor::Middle);

    for zone in Zone::ALL {
        let center_y = zone.center_y(segment);
        let center_z = match zone {
            Zone::Two => -segment.thickness_outer + segment.thickness_inner / 2.0,
            Zone::One | Zone::Three => -segment.thickness_outer / 2.0,
        };
        let height_at = match zone {
            Zone::One => segment.zone2_width / 2.0,
            Zone::Two => -segment.zone2_width / 2.0,
            Zone::Three => -segment.zone2_width / 2.0 - segment.zone3_width,
        };

        plot.annotate(format!("Z{zone}-{index}"), center_y, center_z, label_style.clone());
        plot.annotate(
            format!("b = {}m", zone.width(segment)),
            center_y,
            min_z - 1.0,
            width_style.clone(),
        );
        plot.annotate(
            format!("h = {}m", zone.thickness(segment)),
            height_at,
            center_z,
            height_style.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slabdeck_model::default_segments;

    fn count(plot: &PlotDescription, prefix: &str) -> usize {
        plot.annotations_starting_with(prefix).count()
    }

    fn three_d_points() -> Vec<Segment> {
        vec![
            Segment::new(3.0, 4.0, 2.0, 0.5, 0.8, 0.0),
            Segment::new(3.0, 4.0, 2.0, 0.5, 0.8, 8.0),
            Segment::new(3.0, 4.0, 2.0, 0.6, 1.0, 12.0),
        ]
    }

    #[test]
    fn test_view_kind_axes() {
        for axis in Axis::ALL {
            assert_eq!(ViewKind::from(axis).drop_axis(), axis);
        }
    }

    #[test]
    fn test_horizontal_below_top() {
        let plot = horizontal_view(&default_segments(), -1.0).unwrap();
        assert!(!plot.line_segments.is_empty());
        assert_eq!(count(&plot, "l = "), 1);
        assert_eq!(count(&plot, "Z"), 3);
        assert_eq!(count(&plot, "D-"), 2);
        assert_eq!(count(&plot, "b = "), 6);
        assert_eq!(plot.title, "Horizontale doorsnede (Horizontal Section)");
        assert_eq!(plot.axis_ranges.y, [-19.5, 14.5]);
        assert_eq!(plot.axis_ranges.x, [-2.0, 12.0]);
    }

    #[test]
    fn test_horizontal_only_zone2() {
        let plot = horizontal_view(&default_segments(), 0.5).unwrap();
        assert_eq!(count(&plot, "Z"), 1);
        assert_eq!(count(&plot, "Z2-1"), 1);
        assert_eq!(count(&plot, "b = "), 2);
        assert!(plot.annotations.iter().any(|a| a.text == "b = 5m"));
    }

    #[test]
    fn test_horizontal_zone_label_positions() {
        let plot = horizontal_view(&default_segments(), -1.0).unwrap();
        let z1 = plot.annotations.iter().find(|a| a.text == "Z1-1").unwrap();
        assert!((z1.x - 5.0).abs() < 1e-9);
        assert!((z1.y - 7.5).abs() < 1e-9);
        let z3 = plot.annotations.iter().find(|a| a.text == "Z3-1").unwrap();
        assert!((z3.y + 10.0).abs() < 1e-9);
        let l = plot.annotations.iter().find(|a| a.text == "l = 10m").unwrap();
        assert!((l.y + 18.5).abs() < 1e-5);
        assert_eq!(l.style.color, "red");
    }

    #[test]
    fn test_horizontal_above_deck_is_empty() {
        let plot = horizontal_view(&default_segments(), 5.0).unwrap();
        assert!(plot.line_segments.is_empty());
        assert!(plot.annotations.is_empty());
        // deck extent in (x, y), padded by 2
        assert_eq!(plot.axis_ranges.x, [-2.0, 12.0]);
        assert_eq!(plot.axis_ranges.y, [-19.5, 14.5]);
    }

    #[test]
    fn test_longitudinal_zone2() {
        let plot = longitudinal_view(&default_segments(), 0.0).unwrap();
        assert_eq!(plot.title, "Langsdoorsnede (Longitudinal Section)");
        assert_eq!(count(&plot, "Z2-1"), 1);
        // raised zone 2: h is the inner thickness
        assert_eq!(count(&plot, "h = 3m"), 2);
        let h = plot.annotations.iter().find(|a| a.text == "h = 3m").unwrap();
        assert!((h.y + 0.5).abs() < 1e-9);
        assert_eq!(h.style.x_anchor, XAnchor::Right);
        assert_eq!(plot.axis_ranges.y, [-4.0, 3.0]);
    }

    #[test]
    fn test_longitudinal_outer_zones() {
        let plot = longitudinal_view(&default_segments(), 8.0).unwrap();
        assert_eq!(count(&plot, "Z1-1"), 1);
        assert_eq!(count(&plot, "h = 2m"), 2);
        let h = plot.annotations.iter().find(|a| a.text == "h = 2m").unwrap();
        assert!((h.y + 1.0).abs() < 1e-9);

        let plot = longitudinal_view(&default_segments(), -10.0).unwrap();
        assert_eq!(count(&plot, "Z3-1"), 1);
    }

    #[test]
    fn test_longitudinal_gap_labels() {
        let segments = three_d_points();
        let plot = longitudinal_view(&segments, 0.0).unwrap();
        assert_eq!(count(&plot, "D-"), 3);
        assert_eq!(count(&plot, "l = "), 2);
        assert!(plot.annotations.iter().any(|a| a.text == "l = 12m"));
        // Z2-2 sits at the height center of D3
        let z = plot.annotations.iter().find(|a| a.text == "Z2-2").unwrap();
        assert!((z.x - 14.0).abs() < 1e-9);
        assert!((z.y + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_cross_view_ranges() {
        let plot = cross_view(&default_segments(), 5.0).unwrap();
        assert!(!plot.line_segments.is_empty());
        assert!(plot.annotations.is_empty());
        assert_eq!(plot.axis_ranges.x, [-19.5, 14.5]);
        assert_eq!(plot.axis_ranges.y, [-4.0, 3.0]);
        assert_eq!(plot.x_title, "Y-as - Breedte [m]");
    }

    #[test]
    fn test_cross_view_clamped_to_deck() {
        let segments = default_segments();
        assert!(!cross_view(&segments, 0.0).unwrap().line_segments.is_empty());
        assert!(!cross_view(&segments, 10.0 - 1e-6).unwrap().line_segments.is_empty());
        assert!(!cross_view(&segments, 25.0).unwrap().line_segments.is_empty());
        assert!(!cross_view(&segments, -3.0).unwrap().line_segments.is_empty());
    }

    #[test]
    fn test_cross_view_on_very_short_deck() {
        let segments = vec![
            Segment::new(1.0, 1.0, 1.0, 0.5, 0.8, 0.0),
            Segment::new(1.0, 1.0, 1.0, 0.5, 0.8, 1e-7),
        ];
        for x in [0.0, 5e-8, 1.0, -1.0] {
            assert!(cross_view(&segments, x).is_ok(), "x = {x}");
        }
    }

    #[test]
    fn test_horizontal_at_top_face_has_no_diagonals() {
        let plot = horizontal_view(&default_segments(), 0.0).unwrap();
        assert!(!plot.line_segments.is_empty());
        for (a, b) in &plot.line_segments {
            let dx = (a.x - b.x).abs() > 1e-6;
            let dy = (a.y - b.y).abs() > 1e-6;
            assert!(!(dx && dy), "diagonal {a:?} -> {b:?}");
        }
    }

    #[test]
    fn test_cross_annotations() {
        let segments = three_d_points();
        let mut plot = cross_view(&segments, 10.0).unwrap();
        annotate_cross_section(&mut plot, &segments, 10.0);
        // first D-point at or beyond x = 10 is D3 (index 2)
        assert_eq!(count(&plot, "Z"), 3);
        assert!(plot.annotations.iter().any(|a| a.text == "Z2-2"));
        assert!(plot.annotations.iter().any(|a| a.text == "h = 1m"));
        assert_eq!(count(&plot, "h = 0.6m"), 2);
        assert_eq!(count(&plot, "b = "), 3);
    }

    #[test]
    fn test_invalid_segments() {
        let err = project(&default_segments()[..1], 0.0, Axis::Z).unwrap_err();
        assert!(matches!(err, crate::ViewError::Model(_)));
    }
}
