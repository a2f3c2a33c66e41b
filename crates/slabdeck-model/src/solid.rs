//! Sweeps zone cross-sections between consecutive D-points into a solid.

use slabdeck_math::Point3;
use slabdeck_mesh::{hexahedron, marker_scene, Aabb, MarkerSettings, NodeRole, Scene, TriangleMesh};
use tracing::{debug, info};

use crate::error::Result;
use crate::planes::{create_section_planes, SectionLocations};
use crate::reinforcement::{create_rebars, Reinforcement};
use crate::segment::{d_point_positions, validate_segments, Segment};
use crate::zone::{span_shade, Zone};

/// Name of the deck node inside [`Solid::scene`].
pub const DECK_NODE: &str = "deck";

/// One hexahedron of the deck: a zone swept over one span.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBox {
    /// 1-based span index (span `i` runs from D`i` to D`i+1`).
    pub span: usize,
    /// Which transverse zone.
    pub zone: Zone,
    /// Bottom ring 0-3, top ring 4-7; each ring runs (start, low y),
    /// (end, low y), (end, high y), (start, high y).
    pub corners: [Point3; 8],
}

impl ZoneBox {
    /// Build the box for `zone` between the `start` and `end` segments.
    ///
    /// Each face takes its own segment's dimensions, so zones taper
    /// linearly when consecutive D-points differ.
    pub fn between(span: usize, zone: Zone, start: (&Segment, f64), end: (&Segment, f64)) -> Self {
        let (s0, x0) = start;
        let (s1, x1) = end;
        let (y0_low, y0_high) = zone.y_extent(s0);
        let (y1_low, y1_high) = zone.y_extent(s1);
        let (z0_bottom, z0_top) = zone.z_extent(s0);
        let (z1_bottom, z1_top) = zone.z_extent(s1);

        Self {
            span,
            zone,
            corners: [
                Point3::new(x0, y0_low, z0_bottom),
                Point3::new(x1, y1_low, z1_bottom),
                Point3::new(x1, y1_high, z1_bottom),
                Point3::new(x0, y0_high, z0_bottom),
                Point3::new(x0, y0_low, z0_top),
                Point3::new(x1, y1_low, z1_top),
                Point3::new(x1, y1_high, z1_top),
                Point3::new(x0, y0_high, z0_top),
            ],
        }
    }

    /// Triangulated box.
    pub fn mesh(&self) -> TriangleMesh {
        hexahedron(&self.corners)
    }
}

/// Extra scene content added by [`build_solid_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolidOptions {
    /// Axes and origin dot; `None` leaves them out.
    pub markers: Option<MarkerSettings>,
    /// Translucent section-plane boxes; `None` leaves them out.
    pub section_planes: Option<SectionLocations>,
    /// Reinforcement bars; `None` leaves them out.
    pub reinforcement: Option<Reinforcement>,
}

impl Default for SolidOptions {
    fn default() -> Self {
        Self {
            markers: Some(MarkerSettings::default()),
            section_planes: None,
            reinforcement: None,
        }
    }
}

impl SolidOptions {
    /// Deck only, no decoration.
    pub fn bare() -> Self {
        Self {
            markers: None,
            section_planes: None,
            reinforcement: None,
        }
    }
}

/// The built deck.
///
/// `scene` holds the deck as a single [`NodeRole::Solid`] node plus any
/// decoration. Numeric consumers should go through [`Solid::deck`].
#[derive(Debug, Clone)]
pub struct Solid {
    /// Deck plus decoration nodes.
    pub scene: Scene,
    /// The boxes the deck mesh was built from, in span then zone order.
    pub boxes: Vec<ZoneBox>,
    /// X of every D-point.
    pub positions: Vec<f64>,
    deck_index: usize,
}

impl Solid {
    /// The combined deck mesh.
    pub fn deck(&self) -> &TriangleMesh {
        &self.scene.nodes[self.deck_index].mesh
    }

    /// Deck triangles; decoration excluded.
    pub fn num_triangles(&self) -> usize {
        self.deck().num_triangles()
    }

    /// Number of spans (D-points minus one).
    pub fn num_spans(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Distance from the first to the last D-point.
    pub fn total_length(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Bounds of the deck mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        self.deck().bounds()
    }
}

/// Build the deck with axes and origin markers.
pub fn build_solid(segments: &[Segment]) -> Result<Solid> {
    build_solid_with(segments, &SolidOptions::default())
}

/// Build the deck with the decoration selected in `options`.
pub fn build_solid_with(segments: &[Segment], options: &SolidOptions) -> Result<Solid> {
    validate_segments(segments)?;

    let positions = d_point_positions(segments);
    let count = segments.len();
    debug!(segments = count, "building deck solid");

    let mut boxes = Vec::with_capacity((count - 1) * Zone::ALL.len());
    let mut deck = TriangleMesh::new();
    for span in 1..count {
        let start = (&segments[span - 1], positions[span - 1]);
        let end = (&segments[span], positions[span]);
        let shade = span_shade(span, count);
        for zone in Zone::ALL {
            let zone_box = ZoneBox::between(span, zone, start, end);
            deck.merge(&zone_box.mesh().with_color(zone.color(shade)));
            boxes.push(zone_box);
        }
    }

    let mut scene = Scene::new("slab_deck");
    scene.add(DECK_NODE, NodeRole::Solid, deck);
    if let Some(settings) = &options.markers {
        scene.append(marker_scene(settings));
    }
    if let Some(locations) = &options.section_planes {
        scene.append(create_section_planes(segments, locations)?);
    }
    if let Some(reinforcement) = &options.reinforcement {
        scene.append(create_rebars(segments, reinforcement)?);
    }

    let solid = Solid {
        scene,
        boxes,
        positions,
        deck_index: 0,
    };
    info!(
        spans = solid.num_spans(),
        triangles = solid.num_triangles(),
        nodes = solid.scene.len(),
        "built deck solid"
    );
    Ok(solid)
}
