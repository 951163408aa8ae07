mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use floatgrid_common::WideCellCoord;
use floatgrid_render::{DebugTextRenderer, RenderView, Renderer, TileHandle, TileScene};
use floatgrid_stream::{ChunkStore, ChunkStreamer, StoreKind, coordinate_seed, tint_for};
use glam::DVec3;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "floatgrid-cli", about = "Chunk streaming with a floating origin")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Walk a viewpoint in a straight line and stream chunks around it
    Walk {
        /// YAML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "100")]
        ticks: u64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        start_x: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        start_z: f64,
        /// Viewpoint movement per tick along X
        #[arg(long, default_value = "1.5", allow_hyphen_values = true)]
        step_x: f64,
        /// Viewpoint movement per tick along Z
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        step_z: f64,
        /// Use a bounded board of this many cells per side
        #[arg(long)]
        grid_extent: Option<u32>,
        /// Evict chunks that fall outside the scan window
        #[arg(long)]
        sweep: bool,
        /// Print every streaming event as a JSON line
        #[arg(long)]
        events_json: bool,
        /// Draw an ASCII map of the final scene
        #[arg(long)]
        render: bool,
    },
    /// Show the deterministic tint of a cell
    Tint {
        #[arg(allow_hyphen_values = true)]
        x: i64,
        #[arg(allow_hyphen_values = true)]
        z: i64,
    },
}

struct WalkPlan {
    ticks: u64,
    start: DVec3,
    step: DVec3,
    events_json: bool,
    render: bool,
}

fn walk<S: ChunkStore<Handle = TileHandle>>(
    mut streamer: ChunkStreamer<S>,
    plan: &WalkPlan,
) -> anyhow::Result<()> {
    let mut scene = TileScene::new();
    let mut eye = plan.start;

    for tick in 0..plan.ticks {
        let report = streamer.tick(&mut scene, &mut eye)?;
        for failure in &report.failures {
            tracing::warn!(tick, error = %failure, "collaborator failure");
        }
        if plan.events_json {
            for event in &report.events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        if let Some(shift) = report.shift() {
            tracing::info!(tick, delta = ?shift.delta, "viewpoint re-based");
        }
        eye += plan.step;
    }

    let stats = streamer.stats();
    let timer = streamer.timer();
    println!(
        "Walked {} ticks: loaded={}, tiles={}, created={}, destroyed={}, shifts={}",
        stats.ticks,
        stats.total_loaded,
        scene.len(),
        scene.created(),
        scene.destroyed(),
        stats.total_shifts
    );
    println!(
        "Tick time: avg={:?}, min={:?}, max={:?}",
        timer.average(),
        timer.min(),
        timer.max()
    );
    if let Some(slowest) = timer.max_shift_tick() {
        println!(
            "Shift ticks: {} (slowest {:?}), steady avg={:?}",
            timer.shift_ticks(),
            slowest,
            timer.steady_average()
        );
    }
    let offset = streamer.frame().offset();
    println!(
        "Frame offset: ({:.2}, {:.2}, {:.2}), eye: ({:.2}, {:.2}, {:.2})",
        offset.x, offset.y, offset.z, eye.x, eye.y, eye.z
    );

    if plan.render {
        let view = RenderView {
            eye,
            half_extent: streamer.config().window_half_extent(),
            cell_size: streamer.config().cell_size,
        };
        print!("{}", DebugTextRenderer::new().render(&scene, &view));
    }

    let failures = streamer.unload_all(&mut scene);
    for failure in &failures {
        tracing::warn!(error = %failure, "failed to release tile");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("floatgrid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", floatgrid_common::crate_info());
            println!("stream: {}", floatgrid_stream::crate_info());
            println!("render: {}", floatgrid_render::crate_info());
        }
        Commands::Walk {
            config,
            ticks,
            start_x,
            start_z,
            step_x,
            step_z,
            grid_extent,
            sweep,
            events_json,
            render,
        } => {
            let mut settings = match config {
                Some(path) => Settings::load(&path)?,
                None => Settings::default(),
            };
            if let Some(grid_extent) = grid_extent {
                settings.store = StoreKind::Bounded { grid_extent };
            }
            settings.stream.sweep_stale |= sweep;

            let plan = WalkPlan {
                ticks,
                start: DVec3::new(start_x, 0.0, start_z),
                step: DVec3::new(step_x, 0.0, step_z),
                events_json,
                render,
            };
            tracing::debug!(?settings, "walk settings");

            match settings.store {
                StoreKind::Bounded { grid_extent } => {
                    walk(ChunkStreamer::bounded(settings.stream, grid_extent)?, &plan)?
                }
                StoreKind::Unbounded => walk(ChunkStreamer::unbounded(settings.stream)?, &plan)?,
            }
        }
        Commands::Tint { x, z } => {
            let coord = WideCellCoord::new(x, z);
            let tint = tint_for(coord);
            println!(
                "cell {coord}: seed={:#018x} tint=({:.4}, {:.4}, {:.4})",
                coordinate_seed(coord),
                tint.r,
                tint.g,
                tint.b
            );
        }
    }

    Ok(())
}
