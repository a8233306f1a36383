use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use editor::{EditorConfig, PaintingSession, SessionEvent};
use model::BiomeId;
use replay_protocol::{Scenario, read_scenario, validate_scenario};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod palette;
mod raster_surface;
mod replay;
mod svg_tracer;

use palette::StylePalette;
use raster_surface::RasterSurface;
use replay::{apply_input, frame_rect};
use svg_tracer::RunLengthSvgTracer;

#[derive(Parser)]
#[command(author, version, about = "Replay recorded biome painting input headlessly")]
struct Arguments {
    /// JSONL scenario to replay. Without one an empty map is traced.
    #[arg(long, short = 's', value_parser)]
    scenario: Option<PathBuf>,
    /// Map width in cells, overriding the scenario header.
    #[arg(long)]
    width: Option<u32>,
    /// Map height in cells, overriding the scenario header.
    #[arg(long)]
    height: Option<u32>,
    /// Editor defaults as JSON.
    #[arg(long, short = 'c', value_parser)]
    config: Option<PathBuf>,
    /// Map style applied before replay, by name.
    #[arg(long)]
    style: Option<String>,
    /// Write the traced background SVG here.
    #[arg(long, value_parser)]
    svg_out: Option<PathBuf>,
    /// Write the drawing surface as PNG here.
    #[arg(long, value_parser)]
    surface_png: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short = 'v')]
    verbose: bool,
}

const DEFAULT_MAP_SIZE: u32 = 200;

fn main() -> Result<()> {
    let arguments = Arguments::parse();
    init_logging(arguments.verbose);

    let config = load_config(arguments.config.as_deref())?;
    let mut scenario = match &arguments.scenario {
        Some(path) => load_scenario(path)?,
        None => Scenario::new("empty", DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE),
    };
    if let Some(width) = arguments.width {
        scenario.header.width = width;
    }
    if let Some(height) = arguments.height {
        scenario.header.height = height;
    }
    validate_scenario(&scenario)
        .with_context(|| format!("validate scenario {}", scenario.header.scenario_id))?;

    let palette = StylePalette;
    let mut session = PaintingSession::new(
        config,
        scenario.header.width,
        scenario.header.height,
        frame_rect(scenario.header.frame),
        RasterSurface::default(),
        RunLengthSvgTracer::new(palette),
        palette,
    )
    .context("open painting session")?;

    if let Some(name) = &arguments.style {
        let style_index = palette
            .style_index(name)
            .with_context(|| format!("unknown map style {name}"))?;
        session
            .change_style(style_index)
            .context("apply map style")?;
    }

    let mut strokes = 0usize;
    for event in &scenario.events {
        apply_input(&mut session, &event.input)
            .with_context(|| format!("apply scenario event at tick {}", event.tick))?;
        for session_event in session.drain_events() {
            if let SessionEvent::StrokeEnded { .. } = session_event {
                strokes += 1;
            }
            debug!(tick = event.tick, event = ?session_event, "session event");
        }
    }
    info!(
        scenario_id = %scenario.header.scenario_id,
        events = scenario.events.len(),
        strokes,
        traces = session.tracer().traced(),
        surface_scale = session.surface().scale(),
        "scenario replayed"
    );

    print_histogram(&session.grid().histogram());

    if let Some(path) = &arguments.svg_out {
        fs::write(path, session.background_svg())
            .with_context(|| format!("write SVG {}", path.display()))?;
    }
    if let Some(path) = &arguments.surface_png {
        session
            .surface()
            .image()
            .save(path)
            .with_context(|| format!("write PNG {}", path.display()))?;
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let file = File::open(path).with_context(|| format!("open scenario {}", path.display()))?;
    let mut reader = BufReader::new(file);
    read_scenario(&mut reader).with_context(|| format!("read scenario {}", path.display()))
}

fn print_histogram(counts: &[usize]) {
    let total: usize = counts.iter().sum();
    for biome in BiomeId::all() {
        let cells = counts[biome.index()];
        if cells == 0 {
            continue;
        }
        let share = cells as f64 * 100.0 / total as f64;
        println!("{:<10} {cells:>10} {share:>6.2}%", biome.name());
    }
}
