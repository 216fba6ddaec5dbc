//! epidraw: decompose a drawn stroke into Fourier epicycles.
//!
//! Feeds a stroke (a JSON file of `{row, col}` cells or `{x, y}` pixel
//! positions, or a built-in shape) through a [`Session`], prints the decomposition
//! diagnostics, plays the animation for a number of ticks, and
//! optionally writes an SVG and a PNG of the final tick.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin epidraw -- [OPTIONS] [INPUT]
//! ```
//!
//! Set `RUST_LOG=debug` to see pipeline logging on stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;
mod shapes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use epidraw_export::{Chain, SvgLayers, SvgMetadata, drawing_to_pixels, to_svg};
use epidraw_pipeline::simulate::trace;
use epidraw_pipeline::{EpicycleConfig, GridCell, ManualScheduler, Point, Session};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::render::{Snapshot, render_snapshot};
use crate::shapes::Shape;

/// Fourier epicycle decomposition of a drawn stroke.
///
/// Draws the stroke on a grid, decomposes it, animates the resulting
/// chain of rotating arms, and reports per-stage diagnostics.
#[derive(Parser)]
#[command(name = "epidraw", version)]
struct Cli {
    /// JSON file containing an array of pointer samples, either grid
    /// cells (`{"row": .., "col": ..}`) or surface pixel positions
    /// (`{"x": .., "y": ..}`). Consecutive samples are joined by straight
    /// lines.
    input: Option<PathBuf>,

    /// Built-in stroke to draw when no input file is given.
    #[arg(long, value_enum, conflicts_with = "input")]
    shape: Option<Shape>,

    /// Cells along each side of the drawing surface.
    #[arg(long, default_value_t = EpicycleConfig::DEFAULT_GRID_SIZE)]
    grid_size: u32,

    /// Side length of the drawing and playback surfaces in pixels.
    #[arg(long, default_value_t = EpicycleConfig::DEFAULT_SURFACE_SIZE)]
    surface_size: f64,

    /// Uniform samples taken from the stroke before the transform.
    #[arg(long, default_value_t = EpicycleConfig::DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Maximum number of epicycles kept, largest first.
    #[arg(long, default_value_t = EpicycleConfig::DEFAULT_MAX_COMPONENTS)]
    max_components: usize,

    /// Precomputed frames per revolution.
    #[arg(long, default_value_t = EpicycleConfig::DEFAULT_FRAME_COUNT)]
    frames: usize,

    /// Frames advanced per playback tick.
    #[arg(long, default_value_t = EpicycleConfig::DEFAULT_PLAYBACK_SPEED)]
    speed: f64,

    /// Full configuration as a JSON string.
    ///
    /// When provided, all other configuration flags are ignored. Missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Playback ticks to run. Defaults to one full revolution.
    #[arg(long)]
    ticks: Option<u64>,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Write the drawing, the reconstructed trace, and the chain at the
    /// final tick to an SVG file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Render the final tick (circles, arms, and trail) to a PNG file.
    #[arg(long)]
    png: Option<PathBuf>,
}

/// Build an [`EpicycleConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<EpicycleConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(EpicycleConfig {
        grid_size: cli.grid_size,
        surface_size: cli.surface_size,
        sample_count: cli.samples,
        max_components: cli.max_components,
        frame_count: cli.frames,
        playback_speed: cli.speed,
    })
}

/// Pointer samples read from an input file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum PointerSamples {
    /// Grid cells.
    Cells(Vec<GridCell>),
    /// Positions on the drawing surface in pixels.
    Pixels(Vec<Point>),
}

impl PointerSamples {
    const fn len(&self) -> usize {
        match self {
            Self::Cells(cells) => cells.len(),
            Self::Pixels(points) => points.len(),
        }
    }
}

/// Load pointer samples from the input file, or generate the chosen
/// shape. Returns the samples and a title for exported files.
fn load_stroke(cli: &Cli, grid_size: u32) -> Result<(PointerSamples, String), String> {
    let Some(ref path) = cli.input else {
        let shape = cli.shape.unwrap_or(Shape::Circle);
        return Ok((
            PointerSamples::Cells(shape.samples(grid_size)),
            shape.name().to_string(),
        ));
    };

    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let samples: PointerSamples = serde_json::from_str(&text)
        .map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("epidraw")
        .to_string();
    Ok((samples, title))
}

/// Replay pointer samples as one gesture.
fn draw(session: &mut Session, samples: &PointerSamples) {
    match samples {
        PointerSamples::Cells(cells) => {
            let Some((&first, rest)) = cells.split_first() else {
                return;
            };
            session.gesture_start(first);
            for &cell in rest {
                session.gesture_extend(cell);
            }
        }
        PointerSamples::Pixels(points) => {
            let Some((&first, rest)) = points.split_first() else {
                return;
            };
            session.pointer_start(first);
            for &point in rest {
                session.pointer_extend(point);
            }
        }
    }
    session.gesture_end();
}

/// Ticks needed for one full revolution at the configured speed.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn revolution_ticks(config: &EpicycleConfig) -> u64 {
    (config.frame_count as f64 / config.playback_speed).ceil() as u64
}

/// Run up to `ticks` playback ticks and return the last scene drawn.
fn play(session: &mut Session, ticks: u64) -> Option<Snapshot> {
    let mut scheduler = ManualScheduler::new();
    if let Err(e) = session.start_playback(&mut scheduler) {
        eprintln!("Playback not started: {e}");
        return None;
    }

    let mut last = None;
    for _ in 0..ticks {
        if !scheduler.take() {
            break;
        }
        let Some(scene) = session.tick(&mut scheduler) else {
            break;
        };
        last = Some(Snapshot {
            origin: scene.origin,
            arms: scene.arms,
            trail: scene.trail.to_vec(),
        });
    }
    tracing::debug!(
        ticks,
        wraps = session.player().wraps(),
        index = session.player().index(),
        "playback finished"
    );
    last
}

fn write_svg(
    path: &Path,
    session: &Session,
    snapshot: Option<&Snapshot>,
    title: &str,
) -> Result<(), String> {
    let config = session.config();
    let drawing = drawing_to_pixels(session.drawn_path(), config.cell_size());
    let traced = trace(session.frames());
    let chain = snapshot
        .map(|s| Chain {
            origin: s.origin,
            arms: &s.arms,
        })
        .or_else(|| {
            session.frames().first().map(|f| Chain {
                origin: config.origin(),
                arms: f.arms(),
            })
        });
    let layers = SvgLayers {
        drawing: Some(&drawing),
        trace: Some(&traced),
        chain,
    };

    let config_json = serde_json::to_string(config)
        .map_err(|e| format!("Error serializing config: {e}"))?;
    let description = format!(
        "{} epicycles from {} drawn cells, {} samples",
        session.components().len(),
        session.drawn_path().len(),
        config.sample_count,
    );
    let metadata = SvgMetadata {
        title: Some(title),
        description: Some(&description),
        config_json: Some(&config_json),
    };

    let svg = to_svg(&layers, config.surface_size, &metadata);
    std::fs::write(path, &svg)
        .map_err(|e| format!("Error writing SVG to {}: {e}", path.display()))?;
    eprintln!("SVG written to {} ({} bytes)", path.display(), svg.len());
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn write_png(path: &Path, session: &Session, snapshot: Option<&Snapshot>) -> Result<(), String> {
    let config = session.config();
    let fallback = Snapshot {
        origin: config.origin(),
        arms: session
            .frames()
            .first()
            .map(|f| f.arms().to_vec())
            .unwrap_or_default(),
        trail: Vec::new(),
    };
    let snapshot = snapshot.unwrap_or(&fallback);

    let size = config.surface_size.round() as u32;
    let image = render_snapshot(snapshot, size)
        .ok_or_else(|| format!("Cannot render a {size}x{size} image"))?;
    image
        .save(path)
        .map_err(|e| format!("Error writing PNG to {}: {e}", path.display()))?;
    eprintln!("PNG written to {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let (samples, title) = match load_stroke(&cli, config.grid_size) {
        Ok(stroke) => stroke,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = match Session::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Stroke: {title} ({} pointer samples)", samples.len());
    eprintln!("Config: {:#?}", session.config());
    eprintln!();

    draw(&mut session, &samples);
    let diagnostics = match session.regenerate() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Nothing to animate: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", diagnostics.report());
    }

    let ticks = cli
        .ticks
        .unwrap_or_else(|| revolution_ticks(session.config()));
    let snapshot = play(&mut session, ticks);
    eprintln!(
        "Played {ticks} ticks, {} revolutions completed",
        session.player().wraps()
    );

    if let Some(ref path) = cli.svg
        && let Err(msg) = write_svg(path, &session, snapshot.as_ref(), &title)
    {
        eprintln!("{msg}");
        return ExitCode::FAILURE;
    }

    if let Some(ref path) = cli.png
        && let Err(msg) = write_png(path, &session, snapshot.as_ref())
    {
        eprintln!("{msg}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
