//! Plan view of the deck drawn straight from the segment list.

use slabdeck_model::{d_point_positions, validate_segments, Segment, Zone};
use slabdeck_section::Point2D;

use crate::error::Result;
use crate::plot::{AnnotationStyle, FilledPolygon, PlotDescription, XAnchor, YAnchor, RANGE_PADDING};

/// Gap between a D-point line and its width labels.
const WIDTH_LABEL_OFFSET: f64 = 0.75;

/// Gap between the widest top edge and the D-point labels.
const D_LABEL_OFFSET: f64 = 0.5;

/// Outer and inner edges of the deck at one D-point, top to bottom.
struct Edges {
    top_outer: f64,
    top_inner: f64,
    bottom_inner: f64,
    bottom_outer: f64,
}

impl Edges {
    fn of(segment: &Segment) -> Self {
        let half = segment.zone2_width / 2.0;
        Self {
            top_outer: half + segment.zone1_width,
            top_inner: half,
            bottom_inner: -half,
            bottom_outer: -half - segment.zone3_width,
        }
    }

    fn as_array(&self) -> [f64; 4] {
        [self.top_outer, self.top_inner, self.bottom_inner, self.bottom_outer]
    }

    /// `(high, low)` Y of a zone.
    fn zone(&self, zone: Zone) -> (f64, f64) {
        match zone {
            Zone::One => (self.top_outer, self.top_inner),
            Zone::Two => (self.top_inner, self.bottom_inner),
            Zone::Three => (self.bottom_inner, self.bottom_outer),
        }
    }
}

/// Plan outline: edge lines, translucent zone polygons, zone labels and
/// dimensions.
pub fn top_view(segments: &[Segment]) -> Result<PlotDescription> {
    validate_segments(segments)?;

    let mut plot = PlotDescription::new("Bovenaanzicht (Top View)", "Length (m)", "Width (m)");
    plot.line_color = "blue".to_string();
    let positions = d_point_positions(segments);

    let zone_label_style = AnnotationStyle::new(14, "DarkSlateGray");
    let length_style =
        AnnotationStyle::new(12, "red").anchored(XAnchor::Center, YAnchor::Bottom);

    for span in 1..segments.len() {
        let (x0, x1) = (positions[span - 1], positions[span]);
        let start = Edges::of(&segments[span - 1]);
        let end = Edges::of(&segments[span]);

        for (y0, y1) in start.as_array().into_iter().zip(end.as_array()) {
            plot.add_line(Point2D::new(x0, y0), Point2D::new(x1, y1));
        }

        let x_mid = (x0 + x1) / 2.0;
        for zone in Zone::ALL {
            let (high0, low0) = start.zone(zone);
            let (high1, low1) = end.zone(zone);
            plot.fills.push(FilledPolygon::new(
                vec![
                    Point2D::new(x0, low0),
                    Point2D::new(x1, low1),
                    Point2D::new(x1, high1),
                    Point2D::new(x0, high0),
                ],
                zone.fill(),
            ));
            let y_mid = (high0 + high1 + low0 + low1) / 4.0;
            plot.annotate(
                format!("{zone}-{span}"),
                x_mid,
                y_mid,
                zone_label_style.clone(),
            );
        }

        plot.annotate(
            format!("l = {}m", segments[span].distance_to_previous),
            x_mid,
            start.bottom_outer.min(end.bottom_outer) - 1.0,
            length_style.clone(),
        );
    }

    let width_style = AnnotationStyle::new(12, "red").rotated(-90.0);
    let label_y = segments
        .iter()
        .map(Segment::top_edge_y)
        .fold(f64::NEG_INFINITY, f64::max)
        + D_LABEL_OFFSET;

    for (d, (segment, &x)) in segments.iter().zip(&positions).enumerate() {
        let edges = Edges::of(segment);
        let number = d + 1;

        plot.add_line(Point2D::new(x, edges.top_outer), Point2D::new(x, edges.top_inner));
        plot.add_line(
            Point2D::new(x, edges.bottom_inner),
            Point2D::new(x, edges.bottom_outer),
        );
        plot.add_line(
            Point2D::new(x, edges.top_inner),
            Point2D::new(x, edges.bottom_inner),
        );

        for zone in Zone::ALL {
            let (high, low) = edges.zone(zone);
            plot.annotate(
                format!("bz {zone}-{number}= {}m", zone.width(segment)),
                x - WIDTH_LABEL_OFFSET,
                (high + low) / 2.0,
                width_style.clone(),
            );
        }

        plot.annotate(
            format!("D{number}"),
            x,
            label_y,
            AnnotationStyle::new(15, "black").anchored(XAnchor::Center, YAnchor::Bottom),
        );
    }

    plot.fit_ranges(RANGE_PADDING);
    Ok(plot)
}
