//! Traffic load zones laid over the deck plan.
//!
//! Load zones are stacked from the top structural edge (the outer edge of
//! zone 1) downwards. Every zone but the last has an explicit width per
//! D-point; the last zone takes whatever is left down to the bottom edge.

use serde::{Deserialize, Serialize};
use slabdeck_model::{ModelError, Segment};
use slabdeck_section::Point2D;
use tracing::warn;

use crate::plot::{AnnotationStyle, FilledPolygon, PlotDescription, XAnchor, YAnchor, RANGE_PADDING};

/// Slack allowed before a zone counts as overrunning the deck (m).
const WIDTH_TOLERANCE: f64 = 1e-3;

/// Widths at or below this are not labelled (m).
const MIN_LABELLED_WIDTH: f64 = 0.01;

/// Offset of shared zone boundaries so adjacent outlines stay visible (m).
const SHARED_EDGE_OFFSET: f64 = 0.003;

/// Distance from the last D-point to the zone name labels (m).
const MAIN_LABEL_OFFSET: f64 = 2.0;

/// Default vertical offset of the D-point labels above the top edge (m).
pub const DEFAULT_LABEL_Y_OFFSET: f64 = 1.5;

/// A D-point label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DPointLabel {
    /// Label text, `D{n}`.
    pub text: String,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
}

/// Plan geometry the load zones are laid out on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadZoneGeometry {
    /// X of every D-point.
    pub x_coords: Vec<f64>,
    /// Top structural edge (`bz1 + bz2 / 2`) per D-point.
    pub top_edge: Vec<f64>,
    /// Deck width per D-point.
    pub total_widths: Vec<f64>,
    /// Bottom structural edge (`top - width`) per D-point.
    pub bottom_edge: Vec<f64>,
    /// One label per D-point.
    pub labels: Vec<DPointLabel>,
}

impl LoadZoneGeometry {
    /// Derive the plan geometry from the segment list.
    ///
    /// This check is looser than the solid builder's: zone widths only need
    /// to be non-negative. Distances after the first segment must be
    /// positive. An empty list gives empty geometry.
    pub fn prepare(segments: &[Segment], label_y_offset: f64) -> Result<Self, ModelError> {
        for (i, s) in segments.iter().enumerate() {
            let widths = [s.zone1_width, s.zone2_width, s.zone3_width];
            if !widths.iter().all(|w| w.is_finite() && *w >= 0.0) {
                return Err(ModelError::InvalidGeometry(format!(
                    "segment {n} (D{n}): zone widths must be non-negative, got bz1={}, bz2={}, bz3={}",
                    s.zone1_width,
                    s.zone2_width,
                    s.zone3_width,
                    n = i + 1
                )));
            }
            if i > 0 && (s.distance_to_previous.is_nan() || s.distance_to_previous <= 0.0) {
                return Err(ModelError::InvalidGeometry(format!(
                    "segment {n} (D{n}): distance_to_previous must be positive, got {}",
                    s.distance_to_previous,
                    n = i + 1
                )));
            }
        }

        let x_coords = slabdeck_model::d_point_positions(segments);
        let top_edge: Vec<f64> = segments.iter().map(Segment::top_edge_y).collect();
        let total_widths: Vec<f64> = segments.iter().map(Segment::total_width).collect();
        let bottom_edge = top_edge
            .iter()
            .zip(&total_widths)
            .map(|(top, width)| top - width)
            .collect();
        let labels = x_coords
            .iter()
            .zip(&top_edge)
            .enumerate()
            .map(|(i, (&x, &top))| DPointLabel {
                text: format!("D{}", i + 1),
                x,
                y: top + label_y_offset,
            })
            .collect();

        Ok(Self {
            x_coords,
            top_edge,
            total_widths,
            bottom_edge,
            labels,
        })
    }

    /// Number of D-points.
    pub fn num_d_points(&self) -> usize {
        self.x_coords.len()
    }
}

/// One traffic load zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadZone {
    /// Zone type, e.g. "Voetgangers", "Fietsers", "Auto", "Berm".
    pub zone_type: String,
    /// Width at each D-point; missing entries count as zero.
    #[serde(default)]
    pub widths: Vec<f64>,
}

impl LoadZone {
    /// Create a load zone.
    pub fn new(zone_type: impl Into<String>, widths: Vec<f64>) -> Self {
        Self {
            zone_type: zone_type.into(),
            widths,
        }
    }

    /// Width at D-point `d`.
    pub fn width_at(&self, d: usize) -> f64 {
        self.widths.get(d).copied().unwrap_or(0.0)
    }
}

/// Bottom edge of zone `index` of `count`, given its top edge.
///
/// The last zone extends to the deck's bottom edge.
pub fn zone_bottom_coords(
    index: usize,
    count: usize,
    zone: &LoadZone,
    top: &[f64],
    geometry: &LoadZoneGeometry,
) -> Vec<f64> {
    if index + 1 == count {
        return geometry.bottom_edge.clone();
    }
    top.iter()
        .enumerate()
        .map(|(d, y)| y - zone.width_at(d))
        .collect()
}

/// `(top, bottom)` edges of every zone, stacked from the top structural edge.
pub fn zone_edges(zones: &[LoadZone], geometry: &LoadZoneGeometry) -> Vec<(Vec<f64>, Vec<f64>)> {
    let mut top = geometry.top_edge.clone();
    let mut edges = Vec::with_capacity(zones.len());
    for (i, zone) in zones.iter().enumerate() {
        let bottom = zone_bottom_coords(i, zones.len(), zone, &top, geometry);
        edges.push((top, bottom.clone()));
        top = bottom;
    }
    edges
}

/// Warnings for D-points where the zones need more width than the deck has.
pub fn validate_load_zone_widths(zones: &[LoadZone], geometry: &LoadZoneGeometry) -> Vec<String> {
    if zones.is_empty() {
        return Vec::new();
    }
    if geometry.num_d_points() == 0 {
        return vec![
            "Cannot validate load zones: no D-points defined in the bridge geometry.".to_string(),
        ];
    }

    let mut warnings = Vec::new();
    for d in 0..geometry.num_d_points() {
        let available = geometry.total_widths[d];
        let mut top = geometry.top_edge[d];
        let mut consumed = 0.0;

        for (i, zone) in zones.iter().enumerate() {
            if i + 1 < zones.len() {
                let width = zone.width_at(d);
                consumed += width;
                top -= width;
            } else {
                consumed += (top - geometry.bottom_edge[d]).max(0.0);
            }
        }

        if consumed > available + WIDTH_TOLERANCE {
            let message = format!(
                "At D{}: total zone width ({consumed:.2}m) exceeds bridge width ({available:.2}m) by {:.2}m.",
                d + 1,
                consumed - available
            );
            warn!("{message}");
            warnings.push(message);
        }
    }
    warnings
}

/// `(line, fill)` colors for a zone type.
fn zone_colors(zone_type: &str, exceeds: bool) -> (&'static str, &'static str) {
    if exceeds {
        return ("red", "rgba(255, 0, 0, 0.3)");
    }
    match zone_type {
        "Voetgangers" => ("silver", "rgba(192,192,192,0.2)"),
        "Fietsers" => ("crimson", "rgba(220,20,60,0.3)"),
        "Auto" => ("darkslategrey", "rgba(47,79,79,0.15)"),
        "Berm" => ("goldenrod", "rgba(255, 255, 0, 0.3)"),
        _ => ("grey", "rgba(200,200,200,0.1)"),
    }
}

fn polyline(plot: &mut PlotDescription, xs: &[f64], ys: impl Iterator<Item = f64>) {
    let points: Vec<Point2D> = xs.iter().zip(ys).map(|(&x, y)| Point2D::new(x, y)).collect();
    for pair in points.windows(2) {
        plot.add_line(pair[0], pair[1]);
    }
}

/// Plan plot of the load zones with width labels and overrun warnings.
pub fn load_zone_plot(zones: &[LoadZone], geometry: &LoadZoneGeometry) -> PlotDescription {
    let mut plot = PlotDescription::new("Belastingzones (Load Zones)", "Afstand (m)", "Breedte (m)");
    let xs = &geometry.x_coords;
    let count = zones.len();

    for (i, (zone, (top, bottom))) in zones.iter().zip(zone_edges(zones, geometry)).enumerate() {
        let exceeds = (0..geometry.num_d_points()).any(|d| {
            bottom[d] < geometry.bottom_edge[d] - WIDTH_TOLERANCE
                || top[d] > geometry.top_edge[d] + WIDTH_TOLERANCE
        });
        let (line_color, fill_color) = zone_colors(&zone.zone_type, exceeds);

        let outline: Vec<Point2D> = xs
            .iter()
            .zip(&top)
            .map(|(&x, &y)| Point2D::new(x, y))
            .chain(xs.iter().zip(&bottom).rev().map(|(&x, &y)| Point2D::new(x, y)))
            .collect();
        if !outline.is_empty() {
            plot.fills
                .push(FilledPolygon::new(outline, fill_color).outlined(line_color));
        }

        let top_shift = if i == 0 { 0.0 } else { SHARED_EDGE_OFFSET };
        let bottom_shift = if i + 1 == count { 0.0 } else { SHARED_EDGE_OFFSET };
        polyline(&mut plot, xs, top.iter().map(|y| y - top_shift));
        polyline(&mut plot, xs, bottom.iter().map(|y| y + bottom_shift));

        if let (Some(&x), Some(&t), Some(&b)) = (xs.last(), top.last(), bottom.last()) {
            plot.annotate(
                format!("bz{}: {}", i + 1, zone.zone_type),
                x + MAIN_LABEL_OFFSET,
                (t + b) / 2.0,
                AnnotationStyle::new(10, "black").anchored(XAnchor::Left, YAnchor::Middle),
            );
        }

        let is_last = i + 1 == count;
        for d in 0..geometry.num_d_points() {
            let width = if is_last {
                (top[d] - bottom[d]).abs()
            } else {
                zone.width_at(d)
            };
            if width > MIN_LABELLED_WIDTH {
                plot.annotate(
                    format!("{width:.2}m"),
                    xs[d],
                    (top[d] + bottom[d]) / 2.0,
                    AnnotationStyle::new(8, "black").plain(),
                );
            }
        }
    }

    for label in &geometry.labels {
        plot.annotate(
            label.text.clone(),
            label.x,
            label.y,
            AnnotationStyle::new(15, "black").anchored(XAnchor::Center, YAnchor::Bottom),
        );
    }

    plot.fit_ranges(RANGE_PADDING);

    let warnings = validate_load_zone_widths(zones, geometry);
    let warning_x = xs.first().copied().unwrap_or(0.0);
    let mut warning_y = plot.axis_ranges.y[0];
    for message in warnings {
        plot.annotate(
            format!("Waarschuwing: {message}"),
            warning_x,
            warning_y,
            AnnotationStyle::new(13, "orangered").anchored(XAnchor::Left, YAnchor::Top),
        );
        warning_y -= 1.0;
    }
    plot
}
