//! Renderer-independent plot description.
//!
//! Views produce a [`PlotDescription`]: line segments, filled polygons,
//! text annotations and axis ranges. Turning it into a chart is left to
//! [`to_chart_spec`](crate::to_chart_spec) or to the caller.

use serde::{Deserialize, Serialize};
use slabdeck_section::{BoundingBox2D, Point2D};

/// Padding added around plotted geometry on both axes (m).
pub const RANGE_PADDING: f64 = 2.0;

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAnchor {
    /// Text starts at the anchor.
    Left,
    /// Text is centered on the anchor.
    #[default]
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAnchor {
    /// Text hangs below the anchor.
    Top,
    /// Text is centered on the anchor.
    #[default]
    Middle,
    /// Text sits on the anchor.
    Bottom,
}

/// How an annotation is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Font size in points.
    pub size: u32,
    /// CSS color name or `rgba(...)` string.
    pub color: String,
    /// Text rotation in degrees (negative is clockwise on screen).
    pub angle: f64,
    /// Horizontal anchor.
    pub x_anchor: XAnchor,
    /// Vertical anchor.
    pub y_anchor: YAnchor,
    /// Bold text.
    pub bold: bool,
}

impl AnnotationStyle {
    /// Bold, unrotated, centered text.
    pub fn new(size: u32, color: impl Into<String>) -> Self {
        Self {
            size,
            color: color.into(),
            angle: 0.0,
            x_anchor: XAnchor::Center,
            y_anchor: YAnchor::Middle,
            bold: true,
        }
    }

    /// Rotate the text by `angle` degrees.
    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Set both anchors.
    pub fn anchored(mut self, x: XAnchor, y: YAnchor) -> Self {
        self.x_anchor = x;
        self.y_anchor = y;
        self
    }

    /// Regular weight.
    pub fn plain(mut self) -> Self {
        self.bold = false;
        self
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::new(12, "black")
    }
}

/// A text label placed in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Label text.
    pub text: String,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Drawing style.
    pub style: AnnotationStyle,
}

impl Annotation {
    /// Create an annotation.
    pub fn new(text: impl Into<String>, x: f64, y: f64, style: AnnotationStyle) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            style,
        }
    }
}

/// A closed polygon drawn with a translucent fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledPolygon {
    /// Outline vertices; the polygon closes back to the first one.
    pub vertices: Vec<Point2D>,
    /// Fill color.
    pub fill_color: String,
    /// Outline color; `None` draws no outline.
    pub line_color: Option<String>,
}

impl FilledPolygon {
    /// Polygon with no outline.
    pub fn new(vertices: Vec<Point2D>, fill_color: impl Into<String>) -> Self {
        Self {
            vertices,
            fill_color: fill_color.into(),
            line_color: None,
        }
    }

    /// Add an outline color.
    pub fn outlined(mut self, color: impl Into<String>) -> Self {
        self.line_color = Some(color.into());
        self
    }
}

/// Visible data range on both plot axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    /// `[min, max]` on the horizontal axis.
    pub x: [f64; 2],
    /// `[min, max]` on the vertical axis.
    pub y: [f64; 2],
}

impl AxisRanges {
    /// Ranges of `bounds` grown by `pad` on every side.
    pub fn padded(bounds: &BoundingBox2D, pad: f64) -> Self {
        Self {
            x: [bounds.min_x - pad, bounds.max_x + pad],
            y: [bounds.min_y - pad, bounds.max_y + pad],
        }
    }
}

impl Default for AxisRanges {
    fn default() -> Self {
        Self {
            x: [-RANGE_PADDING, RANGE_PADDING],
            y: [-RANGE_PADDING, RANGE_PADDING],
        }
    }
}

/// Everything needed to draw one 2D view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDescription {
    /// Plot title.
    pub title: String,
    /// Horizontal axis title.
    pub x_title: String,
    /// Vertical axis title.
    pub y_title: String,
    /// Color of every entry in `line_segments`.
    pub line_color: String,
    /// Straight line pieces.
    pub line_segments: Vec<(Point2D, Point2D)>,
    /// Filled polygons, drawn below the lines.
    pub fills: Vec<FilledPolygon>,
    /// Text labels.
    pub annotations: Vec<Annotation>,
    /// Visible range.
    pub axis_ranges: AxisRanges,
}

impl PlotDescription {
    /// An empty plot with black lines.
    pub fn new(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            line_color: "black".to_string(),
            line_segments: Vec::new(),
            fills: Vec::new(),
            annotations: Vec::new(),
            axis_ranges: AxisRanges::default(),
        }
    }

    /// Add a line segment.
    pub fn add_line(&mut self, start: Point2D, end: Point2D) {
        self.line_segments.push((start, end));
    }

    /// Add an annotation.
    pub fn annotate(&mut self, text: impl Into<String>, x: f64, y: f64, style: AnnotationStyle) {
        self.annotations.push(Annotation::new(text, x, y, style));
    }

    /// Annotations whose text starts with `prefix`.
    pub fn annotations_starting_with<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .iter()
            .filter(move |a| a.text.starts_with(prefix))
    }

    /// Bounds of the line segments and polygon vertices.
    pub fn geometry_bounds(&self) -> BoundingBox2D {
        let mut bounds = BoundingBox2D::empty();
        for (a, b) in &self.line_segments {
            bounds.include_point(*a);
            bounds.include_point(*b);
        }
        for p in self.fills.iter().flat_map(|f| f.vertices.iter()) {
            bounds.include_point(*p);
        }
        bounds
    }

    /// Set the axis ranges to the geometry bounds padded by `pad`, keeping the
    /// current ranges when there is no geometry.
    pub fn fit_ranges(&mut self, pad: f64) {
        let bounds = self.geometry_bounds();
        if bounds.is_valid() {
            self.axis_ranges = AxisRanges::padded(&bounds, pad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_builders() {
        let style = AnnotationStyle::new(12, "blue")
            .rotated(-90.0)
            .anchored(XAnchor::Right, YAnchor::Middle);
        assert_eq!(style.angle, -90.0);
        assert_eq!(style.x_anchor, XAnchor::Right);
        assert!(style.bold);
        assert!(!style.plain().bold);
    }

    #[test]
    fn test_fit_ranges() {
        let mut plot = PlotDescription::new("t", "x", "y");
        plot.fit_ranges(RANGE_PADDING);
        assert_eq!(plot.axis_ranges, AxisRanges::default());

        plot.add_line(Point2D::new(0.0, -1.0), Point2D::new(10.0, 3.0));
        plot.fit_ranges(RANGE_PADDING);
        assert_eq!(plot.axis_ranges.x, [-2.0, 12.0]);
        assert_eq!(plot.axis_ranges.y, [-3.0, 5.0]);
    }

    #[test]
    fn test_annotation_filter() {
        let mut plot = PlotDescription::new("t", "x", "y");
        plot.annotate("l = 10m", 0.0, 0.0, AnnotationStyle::default());
        plot.annotate("Z1-1", 0.0, 0.0, AnnotationStyle::default());
        plot.annotate("Z2-1", 0.0, 0.0, AnnotationStyle::default());
        assert_eq!(plot.annotations_starting_with("Z").count(), 2);
        assert_eq!(plot.annotations_starting_with("l = ").count(), 1);
    }

    #[test]
    fn test_serializes_anchors_lowercase() {
        let style = AnnotationStyle::default().anchored(XAnchor::Left, YAnchor::Bottom);
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["x_anchor"], "left");
        assert_eq!(json["y_anchor"], "bottom");
    }
}
