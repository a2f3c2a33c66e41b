//! The per-D-point cross-section definition.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Minimum number of segments a deck needs (one span).
pub const MIN_SEGMENTS: usize = 2;

/// One cross-section definition ("D-point").
///
/// Widths are measured from the deck centerline outward: zone 1 on the
/// positive Y side, zone 2 straddling the centerline, zone 3 on the negative
/// Y side. Field aliases accept the short parameter names used in existing
/// bridge input files (`bz1`, `dz`, `l`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Width of zone 1 (m).
    #[serde(alias = "bz1")]
    pub zone1_width: f64,
    /// Width of zone 2 (m).
    #[serde(alias = "bz2")]
    pub zone2_width: f64,
    /// Width of zone 3 (m).
    #[serde(alias = "bz3")]
    pub zone3_width: f64,
    /// Thickness of zones 1 and 3 (m).
    #[serde(alias = "dz")]
    pub thickness_outer: f64,
    /// Thickness of zone 2 (m).
    #[serde(alias = "dz_2")]
    pub thickness_inner: f64,
    /// Distance from the previous D-point (m). Ignored for the first segment.
    #[serde(alias = "l", default)]
    pub distance_to_previous: f64,
}

impl Segment {
    /// Create a segment.
    pub fn new(
        zone1_width: f64,
        zone2_width: f64,
        zone3_width: f64,
        thickness_outer: f64,
        thickness_inner: f64,
        distance_to_previous: f64,
    ) -> Self {
        Self {
            zone1_width,
            zone2_width,
            zone3_width,
            thickness_outer,
            thickness_inner,
            distance_to_previous,
        }
    }

    /// Full deck width at this D-point.
    pub fn total_width(&self) -> f64 {
        self.zone1_width + self.zone2_width + self.zone3_width
    }

    /// Y of the outer edge of zone 1.
    pub fn top_edge_y(&self) -> f64 {
        self.zone1_width + self.zone2_width / 2.0
    }

    /// Y of the outer edge of zone 3.
    pub fn bottom_edge_y(&self) -> f64 {
        -self.zone2_width / 2.0 - self.zone3_width
    }

    /// Check the dimensions of the segment at `index` in its list.
    pub fn validate(&self, index: usize) -> Result<()> {
        let positive = [
            ("zone1_width", self.zone1_width),
            ("zone2_width", self.zone2_width),
            ("zone3_width", self.zone3_width),
            ("thickness_outer", self.thickness_outer),
            ("thickness_inner", self.thickness_inner),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(index, field, value, "must be positive"));
            }
        }

        let distance = self.distance_to_previous;
        if !distance.is_finite() || distance < 0.0 {
            return Err(invalid(
                index,
                "distance_to_previous",
                distance,
                "must be non-negative",
            ));
        }
        if index > 0 && distance <= 0.0 {
            return Err(invalid(
                index,
                "distance_to_previous",
                distance,
                "must be positive after the first segment",
            ));
        }
        Ok(())
    }
}

fn invalid(index: usize, field: &str, value: f64, rule: &str) -> ModelError {
    ModelError::InvalidGeometry(format!(
        "segment {n} (D{n}): {field} {rule}, got {value}",
        n = index + 1
    ))
}

/// Validate a whole segment list.
pub fn validate_segments(segments: &[Segment]) -> Result<()> {
    if segments.len() < MIN_SEGMENTS {
        return Err(ModelError::InvalidGeometry(format!(
            "at least {MIN_SEGMENTS} segments are required, got {}",
            segments.len()
        )));
    }
    for (i, segment) in segments.iter().enumerate() {
        segment.validate(i)?;
    }
    Ok(())
}

/// Longitudinal position of every D-point. D1 is at x = 0.
pub fn d_point_positions(segments: &[Segment]) -> Vec<f64> {
    let mut x = 0.0;
    segments
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if i > 0 {
                x += s.distance_to_previous;
            }
            x
        })
        .collect()
}

/// Distance from the first to the last D-point.
pub fn total_length(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .skip(1)
        .map(|s| s.distance_to_previous)
        .sum()
}

/// Largest deck width over all D-points.
pub fn max_width(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(Segment::total_width)
        .fold(0.0, f64::max)
}

/// The reference two-D-point deck: 10 m span, zones 10 / 5 / 15 m wide,
/// outer thickness 2 m, inner thickness 3 m.
pub fn default_segments() -> Vec<Segment> {
    vec![
        Segment::new(10.0, 5.0, 15.0, 2.0, 3.0, 0.0),
        Segment::new(10.0, 5.0, 15.0, 2.0, 3.0, 10.0),
    ]
}
