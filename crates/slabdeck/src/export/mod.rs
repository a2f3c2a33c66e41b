//! File output: 3D scenes as glTF, 2D views as JSON.

#[cfg(feature = "gltf")]
mod glb;

#[cfg(feature = "gltf")]
pub use glb::{export_scene_glb, export_scene_gltf, scene_to_glb, scene_to_gltf};

use std::path::Path;

use slabdeck_views::{to_chart_spec, PlotDescription};

use crate::Result;

/// Serialize a view as pretty JSON: the raw [`PlotDescription`], or a
/// Plotly figure when `chart` is set.
pub fn plot_to_json(plot: &PlotDescription, chart: bool) -> Result<String> {
    let text = if chart {
        serde_json::to_string_pretty(&to_chart_spec(plot))?
    } else {
        serde_json::to_string_pretty(plot)?
    };
    Ok(text)
}

/// Write a view to a JSON file. See [`plot_to_json`].
pub fn write_plot_json(plot: &PlotDescription, chart: bool, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, plot_to_json(plot, chart)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slabdeck_model::default_segments;
    use slabdeck_views::cross_view;

    #[test]
    fn test_plot_json_forms() {
        let plot = cross_view(&default_segments(), 5.0).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&plot_to_json(&plot, false).unwrap()).unwrap();
        assert_eq!(raw["axis_ranges"]["x"][0], -19.5);
        let back: PlotDescription = serde_json::from_value(raw).unwrap();
        assert_eq!(back.annotations.len(), plot.annotations.len());

        let chart: serde_json::Value =
            serde_json::from_str(&plot_to_json(&plot, true).unwrap()).unwrap();
        assert!(chart["data"].as_array().is_some_and(|d| !d.is_empty()));
        assert_eq!(chart["layout"]["title"]["text"], plot.title);
    }
}
