//! Bridge input files.
//!
//! A config is JSON or TOML, picked by file extension. Every section is
//! optional and falls back to the reference deck:
//!
//! ```toml
//! [[segments]]
//! bz1 = 10.0
//! bz2 = 5.0
//! bz3 = 15.0
//! dz = 2.0
//! dz_2 = 3.0
//!
//! [[segments]]
//! bz1 = 10.0
//! bz2 = 5.0
//! bz3 = 15.0
//! dz = 2.0
//! dz_2 = 3.0
//! l = 10.0
//!
//! [sections]
//! cross = 7.5
//!
//! [reinforcement]
//! cover = 55.0
//!
//! [[reinforcement.zones]]
//! number = "2-1"
//! top_diameter = 16.0
//! top_spacing = 150.0
//! bottom_diameter = 20.0
//! bottom_spacing = 125.0
//! transverse_diameter = 12.0
//! transverse_spacing = 200.0
//! ```
//!
//! A JSON file may also hold just the segment array.

use std::path::Path;

use serde::{Deserialize, Serialize};
use slabdeck_mesh::MarkerSettings;
use slabdeck_model::{
    build_solid_with, default_segments, validate_segments, Reinforcement, SectionLocations,
    Segment, Solid, SolidOptions,
};
use tracing::debug;

use crate::{DeckError, Result};

/// Everything needed to build and view one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// D-point definitions, first to last.
    pub segments: Vec<Segment>,
    /// Where the canonical sections are taken.
    pub sections: SectionLocations,
    /// Marker sizes.
    pub markers: MarkerSettings,
    /// Bar layout; no zones means an unreinforced model.
    pub reinforcement: Reinforcement,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            sections: SectionLocations::default(),
            markers: MarkerSettings::default(),
            reinforcement: Reinforcement::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Segments(Vec<Segment>),
    Config(BridgeConfig),
}

impl BridgeConfig {
    /// Config with the given segments and default everything else.
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    /// Parse JSON: a full config object or a bare segment array.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(match serde_json::from_str(s)? {
            JsonInput::Segments(segments) => Self::with_segments(segments),
            JsonInput::Config(config) => config,
        })
    }

    /// Parse TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a `.json` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("json") => Self::from_json_str(&text)?,
            Some("toml") => Self::from_toml_str(&text)?,
            _ => return Err(DeckError::UnsupportedFormat(path.display().to_string())),
        };
        debug!(
            path = %path.display(),
            segments = config.segments.len(),
            "loaded bridge config"
        );
        Ok(config)
    }

    /// Pretty JSON form of the config.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the segments and reinforcement the way the solid builder does.
    pub fn validate(&self) -> Result<()> {
        validate_segments(&self.segments)?;
        self.reinforcement.validate(self.segments.len() - 1)?;
        Ok(())
    }

    /// Build options from this config. Reinforcement is included whenever
    /// the config defines any zones.
    pub fn solid_options(&self, markers: bool, section_planes: bool) -> SolidOptions {
        SolidOptions {
            markers: markers.then_some(self.markers),
            section_planes: section_planes.then_some(self.sections),
            reinforcement: (!self.reinforcement.is_empty()).then(|| self.reinforcement.clone()),
        }
    }

    /// Build the deck solid.
    pub fn build_solid(&self, markers: bool, section_planes: bool) -> Result<Solid> {
        Ok(build_solid_with(
            &self.segments,
            &self.solid_options(markers, section_planes),
        )?)
    }
}
