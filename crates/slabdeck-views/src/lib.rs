#![warn(missing_docs)]

//! 2D views of slab-bridge decks.
//!
//! Section views slice the deck solid with a canonical plane and drop one
//! coordinate; the plan and load-zone views are drawn straight from the
//! segment list. Every view yields a renderer-independent
//! [`PlotDescription`], which [`to_chart_spec`] turns into a Plotly figure.
//!
//! # Example
//!
//! ```
//! use slabdeck_model::default_segments;
//! use slabdeck_views::{cross_view, to_chart_spec};
//!
//! let plot = cross_view(&default_segments(), 5.0).unwrap();
//! assert!(!plot.line_segments.is_empty());
//! let figure = to_chart_spec(&plot);
//! assert_eq!(figure["layout"]["xaxis"]["range"][0], -19.5);
//! ```

pub mod chart;
pub mod error;
pub mod load_zones;
pub mod plot;
pub mod projector;
pub mod top_view;

pub use chart::to_chart_spec;
pub use error::{Result, ViewError};
pub use load_zones::{
    load_zone_plot, validate_load_zone_widths, zone_bottom_coords, zone_edges, DPointLabel,
    LoadZone, LoadZoneGeometry, DEFAULT_LABEL_Y_OFFSET,
};
pub use plot::{
    Annotation, AnnotationStyle, AxisRanges, FilledPolygon, PlotDescription, XAnchor, YAnchor,
    RANGE_PADDING,
};
pub use projector::{
    annotate_cross_section, cross_view, horizontal_view, longitudinal_view, project, ViewKind,
};
pub use top_view::top_view;
