//! slabdeck CLI: build, slice and export slab-bridge decks.
//!
//! # Logging
//!
//! `-v` shows info from the slabdeck crates, `-vv` debug. `RUST_LOG`
//! overrides both, e.g. `RUST_LOG=slabdeck_section=debug`.
//!
//! # Example
//!
//! ```bash
//! slabdeck --config bridge.toml info
//! slabdeck export deck.glb --section-planes
//! slabdeck --config bridge.toml export bare.glb --no-rebars
//! slabdeck view cross --offset 7.5 --annotate --chart -o cross.json
//! slabdeck load-zones zones.json -o zones.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use slabdeck::{
    annotate_cross_section, build_solid_with, cross_view, horizontal_view, load_zone_plot,
    longitudinal_view, max_width, plot_to_json, top_view, BridgeConfig, LoadZone,
    LoadZoneGeometry, PlotDescription, DEFAULT_LABEL_Y_OFFSET,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// slabdeck - slab-bridge deck models from the command line.
#[derive(Parser)]
#[command(name = "slabdeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bridge config (.json or .toml); the reference deck when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Suppress all log output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the deck geometry
    Info,
    /// Export the 3D scene (format from extension: .glb, .gltf)
    Export {
        /// Output file
        output: PathBuf,
        /// Leave out the axes and origin dot
        #[arg(long)]
        no_markers: bool,
        /// Add the translucent section-plane boxes
        #[arg(long)]
        section_planes: bool,
        /// Leave out the config's reinforcement bars
        #[arg(long)]
        no_rebars: bool,
    },
    /// Produce a 2D view as JSON
    View {
        /// Which view
        kind: ViewArg,
        /// Cut offset (m); defaults to the config's section location
        #[arg(long)]
        offset: Option<f64>,
        /// Emit a Plotly figure instead of the raw plot description
        #[arg(long)]
        chart: bool,
        /// Add zone labels to a cross section
        #[arg(long)]
        annotate: bool,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Lay traffic load zones over the deck plan
    LoadZones {
        /// JSON array of `{ "zone_type": ..., "widths": [...] }`
        zones: PathBuf,
        /// Height of the D-point labels above the top edge (m)
        #[arg(long, default_value_t = DEFAULT_LABEL_Y_OFFSET)]
        label_offset: f64,
        /// Emit a Plotly figure instead of the raw plot description
        #[arg(long)]
        chart: bool,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Horizontal,
    Longitudinal,
    Cross,
    Top,
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "slabdeck=info,slabdeck_model=info,slabdeck_section=info,slabdeck_views=info",
            2 => "slabdeck=debug,slabdeck_model=debug,slabdeck_section=debug,slabdeck_views=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => show_info(&config),
        Commands::Export {
            output,
            no_markers,
            section_planes,
            no_rebars,
        } => export_scene(&config, &output, !no_markers, section_planes, !no_rebars),
        Commands::View {
            kind,
            offset,
            chart,
            annotate,
            output,
        } => {
            let plot = make_view(&config, kind, offset, annotate)?;
            emit(&plot, chart, output.as_deref())
        }
        Commands::LoadZones {
            zones,
            label_offset,
            chart,
            output,
        } => {
            let plot = make_load_zones(&config, &zones, label_offset)?;
            emit(&plot, chart, output.as_deref())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BridgeConfig> {
    let config = match path {
        Some(path) => BridgeConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BridgeConfig::default(),
    };
    config.validate().context("invalid bridge geometry")?;
    Ok(config)
}

fn show_info(config: &BridgeConfig) -> Result<()> {
    let solid = config.build_solid(false, false)?;

    println!("D-points:     {}", config.segments.len());
    println!("Spans:        {}", solid.num_spans());
    println!("Total length: {} m", solid.total_length());
    println!("Max width:    {} m", max_width(&config.segments));
    println!("Triangles:    {}", solid.num_triangles());
    println!("Rebar zones:  {}", config.reinforcement.zones.len());
    if let Some(b) = solid.bounds() {
        println!(
            "Bounds:       [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        );
    }
    println!();
    println!("  D   bz1     bz2     bz3     dz      dz_2    l");
    for (i, s) in config.segments.iter().enumerate() {
        println!(
            "  {:<3} {:<7} {:<7} {:<7} {:<7} {:<7} {}",
            format!("D{}", i + 1),
            s.zone1_width,
            s.zone2_width,
            s.zone3_width,
            s.thickness_outer,
            s.thickness_inner,
            s.distance_to_previous
        );
    }
    Ok(())
}

fn export_scene(
    config: &BridgeConfig,
    output: &Path,
    markers: bool,
    planes: bool,
    rebars: bool,
) -> Result<()> {
    let mut options = config.solid_options(markers, planes);
    if !rebars {
        options.reinforcement = None;
    }
    let solid = build_solid_with(&config.segments, &options)?;

    let ext = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "glb" => slabdeck::export_scene_glb(&solid.scene, output)?,
        "gltf" => slabdeck::export_scene_gltf(&solid.scene, output)?,
        _ => anyhow::bail!("Unknown output format: {ext}"),
    }
    println!("Exported {} to {}", ext.to_uppercase(), output.display());
    Ok(())
}

fn make_view(
    config: &BridgeConfig,
    kind: ViewArg,
    offset: Option<f64>,
    annotate: bool,
) -> Result<PlotDescription> {
    let segments = &config.segments;
    let sections = &config.sections;
    if annotate && !matches!(kind, ViewArg::Cross) {
        warn!("--annotate only applies to cross sections");
    }
    if offset.is_some() && matches!(kind, ViewArg::Top) {
        warn!("--offset is ignored for the top view");
    }

    let plot = match kind {
        ViewArg::Horizontal => horizontal_view(segments, offset.unwrap_or(sections.horizontal))?,
        ViewArg::Longitudinal => {
            longitudinal_view(segments, offset.unwrap_or(sections.longitudinal))?
        }
        ViewArg::Cross => {
            let x = offset.unwrap_or(sections.cross);
            let mut plot = cross_view(segments, x)?;
            if annotate {
                annotate_cross_section(&mut plot, segments, x);
            }
            plot
        }
        ViewArg::Top => top_view(segments)?,
    };
    info!(
        lines = plot.line_segments.len(),
        annotations = plot.annotations.len(),
        "view ready"
    );
    Ok(plot)
}

fn make_load_zones(
    config: &BridgeConfig,
    zones_path: &Path,
    label_offset: f64,
) -> Result<PlotDescription> {
    let text = std::fs::read_to_string(zones_path)
        .with_context(|| format!("failed to read {}", zones_path.display()))?;
    let zones: Vec<LoadZone> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse load zones in {}", zones_path.display()))?;
    if zones.is_empty() {
        anyhow::bail!("{} defines no load zones", zones_path.display());
    }

    let geometry = LoadZoneGeometry::prepare(&config.segments, label_offset)?;
    Ok(load_zone_plot(&zones, &geometry))
}

fn emit(plot: &PlotDescription, chart: bool, output: Option<&Path>) -> Result<()> {
    let text = plot_to_json(plot, chart)?;
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
