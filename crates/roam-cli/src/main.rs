//! Roam CLI - headless tooling for roaming agents.
//!
//! - `roam simulate` - run a scene file at a fixed timestep
//! - `roam check` - validate a scene file
//! - `roam init` - write a starter scene file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use roam_core::Vec2;

mod scene_file;
mod simulate;

use scene_file::{SceneFile, TEMPLATE};
use simulate::{run_agent, SimOptions};

#[derive(Parser)]
#[command(name = "roam")]
#[command(about = "Waypoint roaming simulator", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene headlessly
    Simulate {
        /// Scene file (YAML); the default villa scene when omitted
        scene: Option<PathBuf>,

        /// Number of ticks to run
        #[arg(long, default_value_t = 600)]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Static observer position as `x,z` (overrides the scene file)
        #[arg(long, value_parser = parse_point)]
        observer: Option<Vec2>,

        /// Drive every agent with a synthetic root-motion clip
        #[arg(long)]
        root_motion: bool,

        /// Print a JSON line every N ticks instead of a summary
        #[arg(long)]
        json: Option<u64>,
    },

    /// Validate a scene file
    Check {
        scene: PathBuf,
    },

    /// Write a starter scene file
    Init {
        #[arg(default_value = "roam.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let z: f32 = z.trim().parse().map_err(|e| format!("bad z: {e}"))?;
    Ok(Vec2::new(x, z))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            scene,
            ticks,
            dt,
            observer,
            root_motion,
            json,
        } => {
            let file = match &scene {
                Some(path) => SceneFile::load(path)?,
                None => SceneFile::default(),
            };
            let options = SimOptions {
                ticks,
                dt,
                observer: observer.or(file.observer),
                force_root_motion: root_motion,
                every: json.unwrap_or(0),
            };
            run_simulation(&file, &options, json.is_some())
        }
        Commands::Check { scene } => check_scene(&scene),
        Commands::Init { path, force } => init_scene(&path, force),
    }
}

fn run_simulation(file: &SceneFile, options: &SimOptions, json: bool) -> Result<()> {
    file.scene.validate().context("Invalid scene")?;
    let gate = Arc::new(file.scene.gate());
    let agents = file.agents();

    tracing::info!(
        agents = agents.len(),
        ticks = options.ticks,
        dt = options.dt,
        "Starting simulation"
    );

    for spec in &agents {
        let mut write_error = None;
        let summary = run_agent(&file.scene, gate.clone(), spec, options, |sample| {
            if write_error.is_some() {
                return;
            }
            match serde_json::to_string(sample) {
                Ok(line) => println!("{line}"),
                Err(err) => write_error = Some(err),
            }
        });
        if let Some(err) = write_error {
            return Err(err).context("Failed to encode sample");
        }

        if json {
            continue;
        }
        println!("{}", summary.name);
        println!(
            "  final position: ({:.2}, {:.2}, {:.2})  heading: {:.1}°  waypoint: {}",
            summary.final_position.x,
            summary.final_position.y,
            summary.final_position.z,
            summary.final_heading_deg,
            summary.final_waypoint
        );
        println!(
            "  arrivals: {}  obstacle skips: {}  probe skips: {}",
            summary.arrivals, summary.obstacle_skips, summary.probe_skips
        );
        println!(
            "  moving: {}/{} ticks  gazing: {}  root motion: {}  travelled: {:.2} m",
            summary.moving_ticks,
            summary.ticks,
            summary.gazing_ticks,
            summary.root_motion_ticks,
            summary.distance_travelled
        );
    }

    tracing::info!("Simulation finished");
    Ok(())
}

fn check_scene(path: &Path) -> Result<()> {
    let file = SceneFile::load(path)?;
    let mut errors = 0;
    let mut warnings = 0;

    if let Err(err) = file.scene.validate() {
        println!("error: scene: {err}");
        errors += 1;
    }

    for spec in file.agents() {
        if let Err(err) = spec.roam.validate() {
            println!("error: {}: {err}", spec.name);
            errors += 1;
        }
        if let Some(clip) = &spec.clip {
            if !(clip.duration.is_finite() && clip.duration > 0.0) {
                println!(
                    "warning: {}: clip `{}` has no usable duration; base speed applies",
                    spec.name, clip.name
                );
                warnings += 1;
            }
        }
        for issue in file.scene.audit_path(spec.roam.path_state().waypoints()) {
            println!("warning: {}: {issue}", spec.name);
            warnings += 1;
        }
    }

    println!(
        "{}: {errors} error(s), {warnings} warning(s)",
        path.display()
    );
    if errors > 0 {
        bail!("{} failed validation", path.display());
    }
    Ok(())
}

fn init_scene(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, TEMPLATE)
        .with_context(|| format!("Failed to write scene to {}", path.display()))?;

    println!("Created {}", path.display());
    println!();
    println!("Next steps:");
    println!("  roam check {}", path.display());
    println!("  roam simulate {} --ticks 1200", path.display());
    Ok(())
}
