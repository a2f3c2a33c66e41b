//! The three transverse structural zones.

use serde::{Deserialize, Serialize};
use slabdeck_mesh::Rgba;

use crate::segment::Segment;

/// A transverse strip of the deck cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Outer strip on the positive Y side.
    One,
    /// Middle strip around the centerline.
    Two,
    /// Outer strip on the negative Y side.
    Three,
}

impl Zone {
    /// All zones, in label order.
    pub const ALL: [Zone; 3] = [Zone::One, Zone::Two, Zone::Three];

    /// Zone number as printed in labels (1, 2 or 3).
    pub fn number(self) -> u8 {
        match self {
            Zone::One => 1,
            Zone::Two => 2,
            Zone::Three => 3,
        }
    }

    /// Zone for a printed number, `None` outside 1..=3.
    pub fn from_number(number: u8) -> Option<Zone> {
        match number {
            1 => Some(Zone::One),
            2 => Some(Zone::Two),
            3 => Some(Zone::Three),
            _ => None,
        }
    }

    /// Width of this zone at `segment`.
    pub fn width(self, segment: &Segment) -> f64 {
        match self {
            Zone::One => segment.zone1_width,
            Zone::Two => segment.zone2_width,
            Zone::Three => segment.zone3_width,
        }
    }

    /// Vertical thickness of this zone at `segment`.
    pub fn thickness(self, segment: &Segment) -> f64 {
        match self {
            Zone::Two => segment.thickness_inner,
            Zone::One | Zone::Three => segment.thickness_outer,
        }
    }

    /// `(low, high)` Y bounds of this zone at `segment`.
    pub fn y_extent(self, segment: &Segment) -> (f64, f64) {
        let half = segment.zone2_width / 2.0;
        match self {
            Zone::One => (half, half + segment.zone1_width),
            Zone::Two => (-half, half),
            Zone::Three => (-half - segment.zone3_width, -half),
        }
    }

    /// `(bottom, top)` Z bounds of this zone at `segment`.
    ///
    /// All zones share the bottom at `-thickness_outer`. Zones 1 and 3 top
    /// out at z = 0; zone 2 is raised by `thickness_inner - thickness_outer`.
    pub fn z_extent(self, segment: &Segment) -> (f64, f64) {
        let bottom = -segment.thickness_outer;
        match self {
            Zone::Two => (bottom, segment.thickness_inner - segment.thickness_outer),
            Zone::One | Zone::Three => (bottom, 0.0),
        }
    }

    /// Y of the middle of this zone at `segment`.
    pub fn center_y(self, segment: &Segment) -> f64 {
        let (low, high) = self.y_extent(segment);
        (low + high) / 2.0
    }

    /// Mesh color for this zone given a span shade.
    pub fn color(self, shade: u8) -> Rgba {
        match self {
            Zone::One => [255, shade, shade, 255],
            Zone::Two => [shade, shade, 255, 255],
            Zone::Three => [shade, 255, shade, 255],
        }
    }

    /// Translucent plan-view fill color.
    pub fn fill(self) -> &'static str {
        match self {
            Zone::One => "rgba(255, 0, 0, 0.15)",
            Zone::Two => "rgba(0, 0, 255, 0.15)",
            Zone::Three => "rgba(0, 255, 0, 0.15)",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Shade shared by all zone boxes of one span.
///
/// Spans are 1-based; the first span gets 0 and each following span steps
/// by `255 / segment_count`.
pub fn span_shade(span: usize, segment_count: usize) -> u8 {
    let step = 255 / segment_count.max(1);
    (span.saturating_sub(1) * step).min(255) as u8
}

/// Label for the `index`-th zone when zones are numbered row by row:
/// `"{zone}-{row}"`, three zones per row.
pub fn zone_number(index: usize) -> String {
    format!("{}-{}", index % 3 + 1, index / 3 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> Segment {
        Segment::new(10.0, 5.0, 15.0, 2.0, 3.0, 0.0)
    }

    #[test]
    fn test_y_extents_tile_the_deck() {
        let s = segment();
        let (z3_low, z3_high) = Zone::Three.y_extent(&s);
        let (z2_low, z2_high) = Zone::Two.y_extent(&s);
        let (z1_low, z1_high) = Zone::One.y_extent(&s);
        assert_eq!(z3_high, z2_low);
        assert_eq!(z2_high, z1_low);
        assert!((z3_low + 17.5).abs() < 1e-12);
        assert!((z1_high - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_z_extents() {
        let s = segment();
        assert_eq!(Zone::One.z_extent(&s), (-2.0, 0.0));
        assert_eq!(Zone::Two.z_extent(&s), (-2.0, 1.0));
        assert_eq!(Zone::Three.z_extent(&s), (-2.0, 0.0));
    }

    #[test]
    fn test_centers() {
        let s = segment();
        assert!((Zone::One.center_y(&s) - 7.5).abs() < 1e-12);
        assert!(Zone::Two.center_y(&s).abs() < 1e-12);
        assert!((Zone::Three.center_y(&s) + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_span_shade() {
        assert_eq!(span_shade(1, 2), 0);
        assert_eq!(span_shade(2, 2), 127);
        assert_eq!(span_shade(3, 4), 126);
        assert_eq!(span_shade(1, 1000), 0);
    }

    #[test]
    fn test_zone_number() {
        assert_eq!(zone_number(0), "1-1");
        assert_eq!(zone_number(2), "3-1");
        assert_eq!(zone_number(3), "1-2");
        assert_eq!(zone_number(7), "2-3");
    }

    #[test]
    fn test_from_number() {
        for zone in Zone::ALL {
            assert_eq!(Zone::from_number(zone.number()), Some(zone));
        }
        assert_eq!(Zone::from_number(0), None);
        assert_eq!(Zone::from_number(4), None);
    }
}
