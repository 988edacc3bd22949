//! # Voxpath
//!
//! 3D voxel grid pathfinding with a tick-driven path executor.
//!
//! ## Architecture Overview
//!
//! Voxpath is split into two components that run one after the other and
//! share no state:
//!
//! - **Pathfinder**: weighted A* over a voxel grid, queried through the
//!   [`WorldQuery`] capability supplied by the host
//! - **PathExecutor**: follows a found path one host tick at a time and turns
//!   each waypoint into a [`MovementIntent`] (yaw plus discrete key states)
//!
//! Around them sit the supporting pieces a host integration needs:
//!
//! - **World**: cell coordinates, the world query trait and an in-memory grid
//! - **Commands**: `*goto`/`*stop`/`*help` text commands driving a [`Navigator`]
//! - **Generation**: seeded terrain for demos, tests and benchmarks
//! - **Simulation**: a kinematic agent for running whole navigations offline
//!
//! ## Typical Flow
//!
//! ```
//! use voxpath::{AgentState, Cell, PathExecutor, Pathfinder, VoxelGrid};
//!
//! let world = VoxelGrid::flat(10, 4, 10, 0);
//! let pathfinder = Pathfinder::default();
//! let path = pathfinder.find_path(&world, Cell::new(0, 1, 0), Cell::new(5, 1, 5));
//! assert!(!path.is_empty());
//!
//! let mut executor = PathExecutor::default();
//! executor.start_path(path);
//! let agent = AgentState::new(0.5, 1.0, 0.5, 0.0);
//! let intent = executor.tick(&world, Some(agent));
//! assert!(intent.forward);
//! ```

pub mod commands;
pub mod executor;
pub mod generation;
pub mod pathfinding;
pub mod simulation;
pub mod utils;
pub mod world;

pub use commands::*;
pub use executor::*;
pub use generation::*;
pub use pathfinding::*;
pub use simulation::*;
pub use utils::*;
pub use world::*;

/// Core error type for the Voxpath engine.
///
/// Search and path following never return this type: an unreachable goal is
/// an empty [`Path`] and an idle executor emits an empty [`MovementIntent`].
/// It covers the surfaces around them (configuration, scene loading and the
/// text command layer).
#[derive(thiserror::Error, Debug)]
pub enum VoxPathError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Command text could not be understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Known command with the wrong number of arguments; carries the usage line
    #[error("{0}")]
    Usage(String),

    /// Coordinates were not integers
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// World description is malformed
    #[error("Invalid world: {0}")]
    InvalidWorld(String),
}

/// Result type used throughout the Voxpath codebase.
pub type VoxPathResult<T> = Result<T, VoxPathError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tuning constants.
pub mod config {
    /// Cost of an axis-aligned step
    pub const STRAIGHT_COST: f64 = 1.0;

    /// Cost of a horizontal diagonal step
    pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

    /// Default cap on node expansions per search
    pub const DEFAULT_MAX_EXPANSIONS: usize = 100_000;

    /// Distance to a waypoint center that counts as reached
    pub const ARRIVAL_THRESHOLD: f64 = 0.5;

    /// Ticks to wait after a jump before jumping again
    pub const JUMP_COOLDOWN_TICKS: u32 = 10;

    /// Height difference above which the agent jumps
    pub const ASCENT_THRESHOLD: f64 = 0.1;

    /// Height difference below which the agent treats the move as a drop
    pub const DESCENT_THRESHOLD: f64 = -0.5;

    /// How far below the feet the edge probe samples
    pub const EDGE_PROBE_DROP: f64 = 0.1;

    /// Prefix that marks chat text as a navigation command
    pub const COMMAND_PREFIX: char = '*';
}
