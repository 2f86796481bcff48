//! Command line front end: plan a sweep, stitch a tile folder, or run a dry
//! sweep over an image standing in for the application canvas.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use image::DynamicImage;
use tilectl::{plan, stitch_row_major, Approach, GridSpec, PanStep};
use tilectl_capture::{
    run_sweep, save_composite, Config, SweepOptions, SystemClock, TileStore, VirtualCanvas,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilectl")]
#[command(about = "Capture and stitch canvases larger than the screen")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/tilectl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the traversal plan: tile order and pans between captures
    Plan {
        #[command(flatten)]
        grid: GridArgs,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Stitch a folder of tiles into one image
    Stitch {
        /// Folder holding the tiles (default from config)
        #[arg(short, long)]
        tiles: Option<PathBuf>,
        /// Output image (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Sweep an image as if it were the application canvas, then stitch
    Simulate {
        /// Image standing in for the canvas
        canvas: PathBuf,
        #[arg(short, long)]
        tiles: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Continue after the tiles already in the folder
        #[arg(long)]
        resume: bool,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Show or initialize the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Grid overrides; anything left out comes from the config file.
#[derive(Args)]
struct GridArgs {
    #[arg(long)]
    cols: Option<u32>,
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    pan_x: Option<u32>,
    #[arg(long)]
    pan_y: Option<u32>,
    #[arg(long)]
    overlap_x: Option<u32>,
    #[arg(long)]
    overlap_y: Option<u32>,
}

impl GridArgs {
    fn apply(&self, base: GridSpec) -> GridSpec {
        GridSpec {
            cols: self.cols.unwrap_or(base.cols),
            rows: self.rows.unwrap_or(base.rows),
            pan_x: self.pan_x.unwrap_or(base.pan_x),
            pan_y: self.pan_y.unwrap_or(base.pan_y),
            overlap_x: self.overlap_x.unwrap_or(base.overlap_x),
            overlap_y: self.overlap_y.unwrap_or(base.overlap_y),
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tilectl={},tilectl_capture={}", level, level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) if path.exists() => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        Some(path) => {
            warn!("config {} not found; using defaults", path.display());
            Ok(Config::default())
        }
        None => Ok(Config::load()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plan { grid, json } => run_plan(grid.apply(config.grid_spec()), json),
        Commands::Stitch {
            tiles,
            output,
            grid,
        } => {
            let tiles_dir = tiles.unwrap_or_else(|| config.capture.tiles_dir.clone());
            run_stitch(
                grid.apply(config.grid_spec()),
                TileStore::new(tiles_dir).load_images()?,
                output.unwrap_or_else(|| config.capture.output.clone()),
            )
        }
        Commands::Simulate {
            canvas,
            tiles,
            output,
            resume,
            grid,
        } => run_simulate(
            grid.apply(config.grid_spec()),
            &canvas,
            tiles.unwrap_or_else(|| config.capture.tiles_dir.clone()),
            output.unwrap_or_else(|| config.capture.output.clone()),
            resume,
            config.sweep_options(),
        ),
        Commands::Config { action } => run_config(&config, cli.config, action),
    }
}

fn run_plan(spec: GridSpec, json: bool) -> anyhow::Result<()> {
    let plan = plan(&spec)?;

    if json {
        let entries: Vec<_> = plan
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "index": entry.index,
                    "col": entry.coordinate.col,
                    "row": entry.coordinate.row,
                    "pans": entry.pan_steps(),
                })
            })
            .collect();
        let doc = serde_json::json!({ "grid": spec, "tiles": entries });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!(
        "{}x{} grid, pan {}x{}, overlap {}x{}",
        spec.cols, spec.rows, spec.pan_x, spec.pan_y, spec.overlap_x, spec.overlap_y
    );
    for entry in &plan {
        let how = match entry.approach {
            Approach::Start => "start".to_string(),
            Approach::Advance(step) => format!("pan ({}, {})", step.dx, step.dy),
            Approach::NewRow { rewind, descend } => format!(
                "pan ({}, {}) then ({}, {})",
                rewind.dx, rewind.dy, descend.dx, descend.dy
            ),
        };
        println!(
            "{:>4}  ({}, {})  {}",
            entry.index + 1,
            entry.coordinate.col,
            entry.coordinate.row,
            how
        );
    }
    Ok(())
}

fn run_stitch(spec: GridSpec, images: Vec<DynamicImage>, output: PathBuf) -> anyhow::Result<()> {
    info!(
        "Loaded {} images. Stitching {} x {}...",
        images.len(),
        spec.cols,
        spec.rows
    );

    let composite = stitch_row_major(images, &spec)?;
    save_composite(&output, &composite)?;
    println!(
        "Saved {}x{} stitched image to {}",
        composite.width(),
        composite.height(),
        output.display()
    );
    Ok(())
}

fn run_simulate(
    spec: GridSpec,
    canvas_path: &Path,
    tiles_dir: PathBuf,
    output: PathBuf,
    resume: bool,
    options: SweepOptions,
) -> anyhow::Result<()> {
    let plan = plan(&spec)?;
    let image = image::open(canvas_path)
        .with_context(|| format!("failed to open {}", canvas_path.display()))?;

    let mut store = TileStore::new(tiles_dir);
    let resume_from = if resume {
        store.captured_count()
    } else {
        let removed = store.clear()?;
        if removed > 0 {
            warn!("removed {} tiles from an earlier run", removed);
        }
        0
    };

    // Tiles as large as the pan distance make the stitched steps match the pans.
    let canvas = VirtualCanvas::new(image, spec.pan_x, spec.pan_y);
    if resume_from > 0 {
        // Put the viewport back over the last tile the earlier run captured.
        if let Some((x, y)) = plan.viewport_offset(resume_from - 1) {
            let dx = i32::try_from(x).context("resume offset out of range")?;
            let dy = i32::try_from(y).context("resume offset out of range")?;
            canvas.shift(PanStep::new(dx, dy))?;
        }
    }

    let options = SweepOptions {
        resume_from,
        ..options
    };
    let summary = run_sweep(
        &plan,
        &mut &canvas,
        &mut &canvas,
        &SystemClock,
        &mut store,
        &options,
    )?;
    info!(
        "captured {} tiles with {} pans",
        summary.captured, summary.pans_applied
    );

    run_stitch(spec, store.load_captured_images()?, output)
}

fn run_config(config: &Config, path: Option<PathBuf>, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Init { force } => {
            let path = path.unwrap_or_else(Config::path);
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
