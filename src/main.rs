//! # Voxpath Main Entry Point
//!
//! Builds a voxel world (from a JSON scene or seeded terrain), searches a path
//! across it and follows the path with a simulated agent, printing what the
//! navigator reports along the way.

use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use voxpath::{
    config, generate_world, run_simulation, Cell, CommandOutcome, KinematicAgent, NeighborPolicy,
    Navigator, PathExecutor, Pathfinder, PathfinderConfig, TerrainConfig, VoxPathError,
    VoxPathResult, VoxelGrid,
};

/// Command line arguments for the Voxpath demo.
#[derive(Parser, Debug)]
#[command(name = "voxpath")]
#[command(about = "3D voxel grid pathfinding with a tick-driven path executor")]
#[command(version)]
struct Args {
    /// JSON scene file to load instead of generating terrain
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Random seed for terrain generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Width and depth of generated terrain
    #[arg(long, default_value_t = 32)]
    size: u32,

    /// Start cell as x,y,z (defaults to the surface at the near corner)
    #[arg(long, value_parser = parse_cell)]
    start: Option<Cell>,

    /// Goal cell as x,y,z (defaults to the surface at the far corner)
    #[arg(long, value_parser = parse_cell)]
    goal: Option<Cell>,

    /// Neighbor policy (simple, enhanced)
    #[arg(long, default_value = "enhanced")]
    policy: NeighborPolicy,

    /// Node expansion cap per search, 0 for unbounded
    #[arg(long, default_value_t = config::DEFAULT_MAX_EXPANSIONS)]
    max_expansions: usize,

    /// Ticks to simulate before giving up
    #[arg(long, default_value_t = 2_000)]
    max_ticks: u32,

    /// Chat command to run instead of searching to --goal, e.g. "*goto 8 3 8"
    #[arg(long)]
    command: Option<String>,

    /// Print the world layer by layer before searching
    #[arg(long)]
    show_world: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> VoxPathResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Voxpath v{}", voxpath::VERSION);

    let world = build_world(&args)?;
    if args.show_world {
        println!("{}", world.to_layers());
    }

    let max_expansions = (args.max_expansions > 0).then_some(args.max_expansions);
    let search_config = PathfinderConfig::new(args.policy).with_max_expansions(max_expansions);
    search_config.validate()?;

    let (width, _, depth) = world.dimensions();
    let start = match args.start {
        Some(cell) => cell,
        None => surface_or_err(&world, 0, 0)?,
    };

    let mut navigator = Navigator::new(Pathfinder::new(search_config), PathExecutor::default());
    let mut agent = KinematicAgent::new(&world, start);

    let outcome = match &args.command {
        Some(text) => navigator.handle_text(&world, Some(agent.state()), text),
        None => {
            let goal = match args.goal {
                Some(cell) => cell,
                None => surface_or_err(&world, width as i32 - 1, depth as i32 - 1)?,
            };
            navigator.navigate(&world, start, goal)
        }
    };
    report_outcome(&outcome);

    if !navigator.executor().is_executing_path() {
        return Ok(());
    }
    if let Some(path) = navigator.executor().current_path() {
        println!("{}", path);
        println!("Path cost: {:.3}", path.total_cost());
    }

    let report = run_simulation(&world, &mut navigator, &mut agent, args.max_ticks);
    if report.arrived {
        println!(
            "Arrived after {} ticks at {:.2}, {:.2}, {:.2}",
            report.ticks, report.final_position.x, report.final_position.y, report.final_position.z
        );
    } else {
        warn!("Agent did not arrive within {} ticks", args.max_ticks);
        println!(
            "Stopped after {} ticks at {:.2}, {:.2}, {:.2}",
            report.ticks, report.final_position.x, report.final_position.y, report.final_position.z
        );
    }

    Ok(())
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG` takes precedence over `--log-level` when set.
fn initialize_logging(log_level: &str) -> VoxPathResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::level_filters::LevelFilter;
        use tracing::Level;
        use tracing_subscriber::EnvFilter;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(level).into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| VoxPathError::InvalidConfig(format!("logging setup failed: {}", e)))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_target(false)
            .try_init()
            .map_err(|e| VoxPathError::InvalidConfig(format!("logging setup failed: {}", e)))?;
    }

    Ok(())
}

/// Loads the scene file if one was given, otherwise generates terrain.
fn build_world(args: &Args) -> VoxPathResult<VoxelGrid> {
    if let Some(path) = &args.scene {
        info!("Loading scene from {}", path.display());
        return VoxelGrid::load(path);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Generating {}x{} terrain with seed {}", args.size, args.size, seed);
    let terrain = TerrainConfig::new(seed).with_size(args.size, args.size);
    generate_world(&terrain)
}

fn surface_or_err(world: &VoxelGrid, x: i32, z: i32) -> VoxPathResult<Cell> {
    world.surface_cell(x, z).ok_or_else(|| {
        VoxPathError::InvalidWorld(format!("no standable cell in column ({}, {})", x, z))
    })
}

fn report_outcome(outcome: &CommandOutcome) {
    for line in outcome.lines() {
        println!("[{:?}] {}", outcome.tone(), line);
    }
}

/// Parses `x,y,z` into a cell.
fn parse_cell(text: &str) -> Result<Cell, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", text));
    }
    let mut coords = [0i32; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not an integer coordinate", part))?;
    }
    Ok(Cell::new(coords[0], coords[1], coords[2]))
}
