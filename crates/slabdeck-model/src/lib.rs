#![warn(missing_docs)]

//! Segment model and solid builder for slab-bridge decks.
//!
//! A deck is described by an ordered list of [`Segment`]s, one per D-point.
//! Each segment gives three transverse zone widths and two thicknesses;
//! [`build_solid`] sweeps the zones between consecutive D-points into
//! hexahedra and returns them as a [`Solid`].
//!
//! # Example
//!
//! ```
//! use slabdeck_model::{build_solid, default_segments};
//!
//! let solid = build_solid(&default_segments()).unwrap();
//! assert_eq!(solid.num_triangles(), 36);
//! ```

pub mod error;
pub mod planes;
pub mod reinforcement;
pub mod segment;
pub mod solid;
pub mod zone;

pub use error::{ModelError, Result};
pub use planes::{create_section_planes, SectionLocations};
pub use reinforcement::{
    bar_offsets, create_rebars, LayerHeights, Reinforcement, ReinforcementZone, REBAR_COLOR,
};
pub use segment::{
    d_point_positions, default_segments, max_width, total_length, validate_segments, Segment,
    MIN_SEGMENTS,
};
pub use solid::{build_solid, build_solid_with, Solid, SolidOptions, ZoneBox, DECK_NODE};
pub use zone::{span_shade, zone_number, Zone};
