//! Reinforcement bars laid into the deck zones.
//!
//! Bar sizes, spacings and cover are given in millimetres, as in bridge
//! input files; the generated geometry is in metres like the deck.
//! Each zone gets two longitudinal layers (bottom and top) running the
//! length of its span and two transverse layers running across the zone.

use serde::{Deserialize, Serialize};
use slabdeck_math::{Axis, Transform};
use slabdeck_mesh::{cylinder, NodeRole, Rgba, Scene, TriangleMesh};
use tracing::{debug, warn};

use crate::error::{ModelError, Result};
use crate::segment::{d_point_positions, validate_segments, Segment};
use crate::zone::Zone;

/// Color of every bar.
pub const REBAR_COLOR: Rgba = [60, 60, 60, 255];

/// Facets around each bar.
pub const REBAR_SECTIONS: u32 = 16;

/// Cover used when an input file gives none (mm).
pub const DEFAULT_COVER_MM: f64 = 55.0;

const MM: f64 = 1e-3;

/// Bar sizes for one zone of one span.
///
/// `number` is `"{zone}-{span}"`, the same labels the views print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementZone {
    /// Zone label, e.g. `"2-1"` for zone 2 of the first span.
    #[serde(alias = "zone_number")]
    pub number: String,
    /// Top longitudinal bar diameter (mm).
    #[serde(alias = "hoofdwapening_langs_boven_diameter")]
    pub top_diameter: f64,
    /// Top longitudinal centre-to-centre spacing (mm).
    #[serde(alias = "hoofdwapening_langs_boven_hart_op_hart")]
    pub top_spacing: f64,
    /// Bottom longitudinal bar diameter (mm).
    #[serde(alias = "hoofdwapening_langs_onder_diameter")]
    pub bottom_diameter: f64,
    /// Bottom longitudinal centre-to-centre spacing (mm).
    #[serde(alias = "hoofdwapening_langs_onder_hart_op_hart")]
    pub bottom_spacing: f64,
    /// Transverse bar diameter (mm).
    #[serde(alias = "hoofdwapening_dwars_diameter")]
    pub transverse_diameter: f64,
    /// Transverse centre-to-centre spacing along the span (mm).
    #[serde(alias = "hoofdwapening_dwars_hart_op_hart")]
    pub transverse_spacing: f64,
}

impl ReinforcementZone {
    /// Zone with the same bar diameter and spacing in every layer.
    pub fn uniform(number: impl Into<String>, diameter: f64, spacing: f64) -> Self {
        Self {
            number: number.into(),
            top_diameter: diameter,
            top_spacing: spacing,
            bottom_diameter: diameter,
            bottom_spacing: spacing,
            transverse_diameter: diameter,
            transverse_spacing: spacing,
        }
    }

    /// Parse `number` into a zone and a 1-based span.
    pub fn location(&self, span_count: usize) -> Result<(Zone, usize)> {
        let parsed = self.number.split_once('-').and_then(|(zone, span)| {
            let zone = zone.trim().parse::<u8>().ok().and_then(Zone::from_number)?;
            let span = span.trim().parse::<usize>().ok()?;
            Some((zone, span))
        });
        match parsed {
            Some((zone, span)) if (1..=span_count).contains(&span) => Ok((zone, span)),
            Some((_, span)) => Err(ModelError::InvalidReinforcement(format!(
                "zone {}: span {span} outside 1..={span_count}",
                self.number
            ))),
            None => Err(ModelError::InvalidReinforcement(format!(
                "zone {}: expected \"<zone 1-3>-<span>\"",
                self.number
            ))),
        }
    }

    fn validate(&self, span_count: usize) -> Result<()> {
        self.location(span_count)?;
        let sizes = [
            ("top_diameter", self.top_diameter),
            ("top_spacing", self.top_spacing),
            ("bottom_diameter", self.bottom_diameter),
            ("bottom_spacing", self.bottom_spacing),
            ("transverse_diameter", self.transverse_diameter),
            ("transverse_spacing", self.transverse_spacing),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidReinforcement(format!(
                    "zone {}: {field} must be positive, got {value}",
                    self.number
                )));
            }
        }
        Ok(())
    }
}

/// Reinforcement for the whole deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reinforcement {
    /// Concrete cover to the outermost bar layer (mm).
    #[serde(alias = "dekking")]
    pub cover: f64,
    /// Longitudinal bars in the outer layer, transverse bars inside them.
    /// When false the transverse bars take the outer layer.
    #[serde(alias = "langswapening_buiten")]
    pub longitudinal_outside: bool,
    /// Per-zone bar sizes.
    #[serde(alias = "reinforcement_zones_array")]
    pub zones: Vec<ReinforcementZone>,
}

impl Default for Reinforcement {
    fn default() -> Self {
        Self {
            cover: DEFAULT_COVER_MM,
            longitudinal_outside: true,
            zones: Vec::new(),
        }
    }
}

impl Reinforcement {
    /// True when no zone is reinforced.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Check cover and every zone against a deck with `span_count` spans.
    pub fn validate(&self, span_count: usize) -> Result<()> {
        if !self.cover.is_finite() || self.cover < 0.0 {
            return Err(ModelError::InvalidReinforcement(format!(
                "cover must be non-negative, got {}",
                self.cover
            )));
        }
        for zone in &self.zones {
            zone.validate(span_count)?;
        }
        Ok(())
    }
}

/// Centre heights of the four bar layers in one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerHeights {
    /// Bottom longitudinal layer.
    pub bottom_longitudinal: f64,
    /// Bottom transverse layer.
    pub bottom_transverse: f64,
    /// Top longitudinal layer.
    pub top_longitudinal: f64,
    /// Top transverse layer.
    pub top_transverse: f64,
}

impl LayerHeights {
    /// Stack the layers inside `(bottom, top)` with `cover` (m) to the
    /// outer layer and each inner layer touching the one outside it.
    pub fn stack(
        (bottom, top): (f64, f64),
        cover: f64,
        zone: &ReinforcementZone,
        longitudinal_outside: bool,
    ) -> Self {
        let bottom_long = zone.bottom_diameter * MM;
        let top_long = zone.top_diameter * MM;
        let transverse = zone.transverse_diameter * MM;

        if longitudinal_outside {
            let bottom_longitudinal = bottom + cover + bottom_long / 2.0;
            let top_longitudinal = top - cover - top_long / 2.0;
            Self {
                bottom_longitudinal,
                bottom_transverse: bottom_longitudinal + (bottom_long + transverse) / 2.0,
                top_longitudinal,
                top_transverse: top_longitudinal - (top_long + transverse) / 2.0,
            }
        } else {
            let bottom_transverse = bottom + cover + transverse / 2.0;
            let top_transverse = top - cover - transverse / 2.0;
            Self {
                bottom_longitudinal: bottom_transverse + (transverse + bottom_long) / 2.0,
                bottom_transverse,
                top_longitudinal: top_transverse - (transverse + top_long) / 2.0,
                top_transverse,
            }
        }
    }
}

/// Offsets of the bars that fit in `width` at no less than `spacing`.
///
/// `floor(width / spacing)` bars are spread evenly at `width / n` and
/// centred on zero; an odd count puts a bar on the centre.
pub fn bar_offsets(width: f64, spacing: f64) -> Vec<f64> {
    if width <= 0.0 || spacing <= 0.0 {
        return Vec::new();
    }
    let count = (width / spacing).floor() as usize;
    if count == 0 {
        return Vec::new();
    }
    let step = width / count as f64;
    let middle = (count as f64 - 1.0) / 2.0;
    (0..count).map(|i| (i as f64 - middle) * step).collect()
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Build one [`NodeRole::Reinforcement`] node per reinforced zone.
///
/// Longitudinal bars run the full span at the start D-point's zone width
/// and height. Transverse bars follow the zone as it tapers and stop
/// `cover` short of its sides.
pub fn create_rebars(segments: &[Segment], reinforcement: &Reinforcement) -> Result<Scene> {
    validate_segments(segments)?;
    let span_count = segments.len() - 1;
    reinforcement.validate(span_count)?;

    let positions = d_point_positions(segments);
    let cover = reinforcement.cover * MM;
    let along_x = Transform::z_onto(Axis::X);
    let along_y = Transform::z_onto(Axis::Y);

    let mut scene = Scene::new("reinforcement");
    for entry in &reinforcement.zones {
        let (zone, span) = entry.location(span_count)?;
        let (start, end) = (&segments[span - 1], &segments[span]);
        let x0 = positions[span - 1];
        let length = positions[span] - x0;
        let heights = LayerHeights::stack(
            zone.z_extent(start),
            cover,
            entry,
            reinforcement.longitudinal_outside,
        );

        let mut bars = TriangleMesh::new();
        let mut count = 0;

        let y_center = zone.center_y(start);
        let layers = [
            (entry.bottom_diameter, entry.bottom_spacing, heights.bottom_longitudinal),
            (entry.top_diameter, entry.top_spacing, heights.top_longitudinal),
        ];
        for (diameter, spacing, z) in layers {
            let d = diameter * MM;
            let bar = cylinder(d / 2.0, length, REBAR_SECTIONS).transformed(&along_x);
            for dy in bar_offsets(zone.width(start) - 2.0 * cover - d, spacing * MM) {
                let place = Transform::translation(x0 + length / 2.0, y_center + dy, z);
                bars.merge(&bar.transformed(&place));
                count += 1;
            }
        }

        let d = entry.transverse_diameter * MM;
        for dx in bar_offsets(length - 2.0 * cover - d, entry.transverse_spacing * MM) {
            let x = length / 2.0 + dx;
            let t = x / length;
            let bar_length = lerp(zone.width(start), zone.width(end), t) - 2.0 * cover;
            if bar_length <= 0.0 {
                continue;
            }
            let y = lerp(zone.center_y(start), zone.center_y(end), t);
            let bar = cylinder(d / 2.0, bar_length, REBAR_SECTIONS).transformed(&along_y);
            for z in [heights.bottom_transverse, heights.top_transverse] {
                bars.merge(&bar.transformed(&Transform::translation(x0 + x, y, z)));
                count += 1;
            }
        }

        if bars.is_empty() {
            warn!(zone = %entry.number, "no bars fit inside the cover");
            continue;
        }
        debug!(zone = %entry.number, bars = count, "placed reinforcement");
        scene.add(
            format!("rebars_{}", entry.number),
            NodeRole::Reinforcement,
            bars.with_color(REBAR_COLOR),
        );
    }
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::default_segments;
    use approx::assert_relative_eq;

    const TRIANGLES_PER_BAR: usize = 4 * REBAR_SECTIONS as usize;

    fn layout(zones: Vec<ReinforcementZone>) -> Reinforcement {
        Reinforcement {
            cover: 50.0,
            longitudinal_outside: true,
            zones,
        }
    }

    #[test]
    fn test_bar_offsets() {
        let odd = bar_offsets(1.0, 0.3);
        assert_eq!(odd.len(), 3);
        assert_relative_eq!(odd[0], -1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(odd[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(odd[2], 1.0 / 3.0, epsilon = 1e-12);

        let even = bar_offsets(1.0, 0.25);
        assert_eq!(even.len(), 4);
        assert_relative_eq!(even[0], -0.375, epsilon = 1e-12);
        assert_relative_eq!(even[3], 0.375, epsilon = 1e-12);

        assert!(bar_offsets(0.1, 0.2).is_empty());
        assert!(bar_offsets(-1.0, 0.2).is_empty());
    }

    #[test]
    fn test_zone_location() {
        let at = |number: &str| ReinforcementZone::uniform(number, 20.0, 150.0).location(2);
        assert_eq!(at("1-1").unwrap(), (Zone::One, 1));
        assert_eq!(at("3-2").unwrap(), (Zone::Three, 2));
        for bad in ["2-3", "2-0", "4-1", "1", "a-b"] {
            assert!(
                matches!(at(bad), Err(ModelError::InvalidReinforcement(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_layer_order() {
        let zone = ReinforcementZone::uniform("2-1", 20.0, 150.0);

        let outside = LayerHeights::stack((-2.0, 1.0), 0.05, &zone, true);
        assert_relative_eq!(outside.bottom_longitudinal, -1.94, epsilon = 1e-12);
        assert_relative_eq!(outside.bottom_transverse, -1.92, epsilon = 1e-12);
        assert_relative_eq!(outside.top_longitudinal, 0.94, epsilon = 1e-12);
        assert_relative_eq!(outside.top_transverse, 0.92, epsilon = 1e-12);

        let inside = LayerHeights::stack((-2.0, 1.0), 0.05, &zone, false);
        assert_relative_eq!(inside.bottom_transverse, -1.94, epsilon = 1e-12);
        assert_relative_eq!(inside.bottom_longitudinal, -1.92, epsilon = 1e-12);
        assert_relative_eq!(inside.top_transverse, 0.94, epsilon = 1e-12);
        assert_relative_eq!(inside.top_longitudinal, 0.92, epsilon = 1e-12);
    }

    #[test]
    fn test_bar_count_in_middle_zone() {
        // 4.88 m of usable width at 1 m spacing: 4 bars per longitudinal layer.
        // 9.88 m of usable length: 9 transverse bars per layer.
        let reinforcement = layout(vec![ReinforcementZone::uniform("2-1", 20.0, 1000.0)]);
        let scene = create_rebars(&default_segments(), &reinforcement).unwrap();
        assert_eq!(scene.len(), 1);
        let node = scene.node("rebars_2-1").unwrap();
        assert_eq!(node.role, NodeRole::Reinforcement);
        assert_eq!(node.mesh.num_triangles(), (2 * 4 + 2 * 9) * TRIANGLES_PER_BAR);
        assert_eq!(&node.mesh.colors[0..4], &REBAR_COLOR);
    }

    #[test]
    fn test_bars_stay_inside_cover() {
        let reinforcement = layout(vec![ReinforcementZone::uniform("2-1", 20.0, 1000.0)]);
        let scene = create_rebars(&default_segments(), &reinforcement).unwrap();
        let b = scene.bounds(NodeRole::Reinforcement).unwrap();
        // zone 2 spans y -2.5..2.5 and z -2..1
        assert_relative_eq!(b.min.y, -2.45, epsilon = 1e-5);
        assert_relative_eq!(b.max.y, 2.45, epsilon = 1e-5);
        assert_relative_eq!(b.min.z, -1.95, epsilon = 1e-5);
        assert_relative_eq!(b.max.z, 0.95, epsilon = 1e-5);
        assert_relative_eq!(b.min.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(b.max.x, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_outer_zone_is_offset_from_centerline() {
        let reinforcement = layout(vec![ReinforcementZone::uniform("1-1", 20.0, 1000.0)]);
        let scene = create_rebars(&default_segments(), &reinforcement).unwrap();
        let b = scene.bounds(NodeRole::Reinforcement).unwrap();
        // zone 1 spans y 2.5..12.5 and tops out at z = 0
        assert_relative_eq!(b.min.y, 2.55, epsilon = 1e-5);
        assert_relative_eq!(b.max.y, 12.45, epsilon = 1e-5);
        assert_relative_eq!(b.max.z, -0.05, epsilon = 1e-5);
    }

    #[test]
    fn test_transverse_bars_follow_taper() {
        let segments = vec![
            Segment::new(2.0, 4.0, 2.0, 0.5, 0.8, 0.0),
            Segment::new(2.0, 2.0, 2.0, 0.5, 0.8, 4.0),
        ];
        let mut zone = ReinforcementZone::uniform("2-1", 10.0, 1000.0);
        // no longitudinal bars fit at this spacing
        zone.top_spacing = 10_000.0;
        zone.bottom_spacing = 10_000.0;
        let scene = create_rebars(&segments, &layout(vec![zone])).unwrap();
        let b = scene.bounds(NodeRole::Reinforcement).unwrap();
        // three bars over 3.89 m of usable length, zone narrowing 4 -> 2 m
        let step = 3.89 / 3.0;
        assert_relative_eq!(b.min.x, 2.0 - step - 0.005, epsilon = 1e-5);
        assert_relative_eq!(b.max.x, 2.0 + step + 0.005, epsilon = 1e-5);
        let widest = 4.0 - 2.0 * (2.0 - step) / 4.0;
        assert_relative_eq!(b.max.y, widest / 2.0 - 0.05, epsilon = 1e-5);
        assert_relative_eq!(b.min.y, -(widest / 2.0 - 0.05), epsilon = 1e-5);
        assert_eq!(
            scene.num_triangles(NodeRole::Reinforcement),
            2 * 3 * TRIANGLES_PER_BAR
        );
    }

    #[test]
    fn test_zone_without_room_is_skipped() {
        let mut reinforcement = layout(vec![ReinforcementZone::uniform("2-1", 20.0, 1000.0)]);
        reinforcement.cover = 20_000.0;
        let scene = create_rebars(&default_segments(), &reinforcement).unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_invalid_reinforcement() {
        let segments = default_segments();
        let mut zone = ReinforcementZone::uniform("2-1", 20.0, 150.0);
        zone.transverse_spacing = 0.0;
        let err = create_rebars(&segments, &layout(vec![zone])).unwrap_err();
        assert!(err.to_string().contains("transverse_spacing"), "{err}");

        let mut reinforcement = layout(Vec::new());
        reinforcement.cover = -1.0;
        assert!(matches!(
            create_rebars(&segments, &reinforcement),
            Err(ModelError::InvalidReinforcement(_))
        ));
        assert!(matches!(
            create_rebars(&segments[..1], &layout(Vec::new())),
            Err(ModelError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_input_file_field_names() {
        let json = r#"{
            "dekking": 45,
            "langswapening_buiten": false,
            "reinforcement_zones_array": [{
                "zone_number": "3-1",
                "hoofdwapening_langs_boven_diameter": 12,
                "hoofdwapening_langs_boven_hart_op_hart": 150,
                "hoofdwapening_langs_onder_diameter": 16,
                "hoofdwapening_langs_onder_hart_op_hart": 125,
                "hoofdwapening_dwars_diameter": 10,
                "hoofdwapening_dwars_hart_op_hart": 200
            }]
        }"#;
        let reinforcement: Reinforcement = serde_json::from_str(json).unwrap();
        assert_eq!(reinforcement.cover, 45.0);
        assert!(!reinforcement.longitudinal_outside);
        assert_eq!(reinforcement.zones[0].number, "3-1");
        assert_eq!(reinforcement.zones[0].bottom_spacing, 125.0);

        let defaults: Reinforcement = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, Reinforcement::default());
        assert!(defaults.is_empty());
    }
}
