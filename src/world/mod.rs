//! # World Module
//!
//! Grid coordinates and the world query capability the core consumes.
//!
//! The host engine owns the actual voxel data. The core only asks three
//! questions about a cell (is it open, is there solid support under it, and
//! what kind of surface is it) through the [`WorldQuery`] trait. [`VoxelGrid`]
//! is an in-memory implementation used by the CLI, tests and benchmarks.

pub mod grid;

pub use grid::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer coordinate of a unit cell in the voxel world.
///
/// `y` is the vertical axis. North is `-z`, south is `+z`, east is `+x` and
/// west is `-x`.
///
/// # Examples
///
/// ```
/// use voxpath::Cell;
///
/// let cell = Cell::new(3, 1, 4);
/// assert_eq!(cell.up(), Cell::new(3, 2, 4));
/// assert_eq!(cell.euclidean_distance(Cell::new(3, 1, 0)), 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    /// Creates a new cell with the given coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the origin cell (0, 0, 0).
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns this cell shifted by the given deltas.
    ///
    /// Coordinates wrap at the `i32` limits; such cells lie outside any
    /// queryable region anyway.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }

    /// The cell directly above.
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The cell directly below.
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Straight-line distance to another cell.
    pub fn euclidean_distance(self, other: Cell) -> f64 {
        let [dx, dy, dz] = self.axis_gaps(other).map(|gap| gap as f64);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Sum of absolute per-axis differences.
    pub fn manhattan_distance(self, other: Cell) -> u64 {
        self.axis_gaps(other).iter().sum()
    }

    /// Largest absolute per-axis difference.
    pub fn chebyshev_distance(self, other: Cell) -> u64 {
        self.axis_gaps(other).into_iter().max().unwrap_or(0)
    }

    /// Absolute per-axis differences, widened so extreme coordinates cannot
    /// overflow.
    fn axis_gaps(self, other: Cell) -> [u64; 3] {
        [
            (self.x as i64 - other.x as i64).unsigned_abs(),
            (self.y as i64 - other.y as i64).unsigned_abs(),
            (self.z as i64 - other.z as i64).unsigned_abs(),
        ]
    }
}

impl std::ops::Add for Cell {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.offset(other.x, other.y, other.z)
    }
}

impl std::ops::Sub for Cell {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The four horizontal compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    South,
    East,
    West,
}

impl Cardinal {
    /// Converts a direction to a cell delta.
    pub fn to_delta(self) -> Cell {
        match self {
            Cardinal::North => Cell::new(0, 0, -1),
            Cardinal::South => Cell::new(0, 0, 1),
            Cardinal::East => Cell::new(1, 0, 0),
            Cardinal::West => Cell::new(-1, 0, 0),
        }
    }

    /// Rounds a yaw in degrees to the nearest cardinal direction.
    ///
    /// Yaw 0 faces south, 90 faces west, ±180 faces north and -90 faces east.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxpath::Cardinal;
    ///
    /// assert_eq!(Cardinal::from_yaw(10.0), Cardinal::South);
    /// assert_eq!(Cardinal::from_yaw(100.0), Cardinal::West);
    /// assert_eq!(Cardinal::from_yaw(-170.0), Cardinal::North);
    /// assert_eq!(Cardinal::from_yaw(-60.0), Cardinal::East);
    /// ```
    pub fn from_yaw(yaw: f64) -> Cardinal {
        let yaw = crate::utils::wrap_degrees(yaw);
        if yaw > -45.0 && yaw <= 45.0 {
            Cardinal::South
        } else if yaw > 45.0 && yaw <= 135.0 {
            Cardinal::West
        } else if yaw > 135.0 || yaw <= -135.0 {
            Cardinal::North
        } else {
            Cardinal::East
        }
    }
}

/// Shape of the surface occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Full-height or empty cell
    #[default]
    Normal,
    /// Partial-height surface (slab or stair) that allows a half-step rise
    StepCapable,
}

/// Failure reported by the host when a cell cannot be queried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldQueryError {
    /// The cell lies outside the region the host can answer for
    #[error("cell {0} is outside the queryable region")]
    OutOfBounds(Cell),

    /// The host could not answer right now (e.g. chunk not loaded)
    #[error("world data unavailable: {0}")]
    Unavailable(String),
}

/// Read-only voxel queries supplied by the host world.
///
/// Implementations must be side-effect free and give consistent answers for
/// the duration of one search. Errors are never propagated by the core: the
/// provided `query_*` helpers turn any failure into the conservative answer
/// (closed, unsupported, normal surface).
pub trait WorldQuery {
    /// Whether an agent's body can occupy the cell.
    fn is_open_space(&self, cell: Cell) -> Result<bool, WorldQueryError>;

    /// Whether the cell directly below `cell` is solid enough to stand on.
    fn has_solid_support_below(&self, cell: Cell) -> Result<bool, WorldQueryError>;

    /// Surface kind of the cell.
    fn surface_kind(&self, cell: Cell) -> Result<SurfaceKind, WorldQueryError>;

    /// [`is_open_space`](Self::is_open_space), treating failures as closed.
    fn query_open(&self, cell: Cell) -> bool {
        self.is_open_space(cell).unwrap_or_else(|e| {
            log::trace!("open-space query failed at {}: {}", cell, e);
            false
        })
    }

    /// [`has_solid_support_below`](Self::has_solid_support_below), treating
    /// failures as unsupported.
    fn query_support(&self, cell: Cell) -> bool {
        self.has_solid_support_below(cell).unwrap_or_else(|e| {
            log::trace!("support query failed at {}: {}", cell, e);
            false
        })
    }

    /// [`surface_kind`](Self::surface_kind), treating failures as normal.
    fn query_surface(&self, cell: Cell) -> SurfaceKind {
        self.surface_kind(cell).unwrap_or_else(|e| {
            log::trace!("surface query failed at {}: {}", cell, e);
            SurfaceKind::Normal
        })
    }

    /// Open space with solid support below and open space above.
    fn is_walkable(&self, cell: Cell) -> bool {
        self.query_open(cell) && self.query_support(cell) && self.query_open(cell.up())
    }
}

impl<W: WorldQuery + ?Sized> WorldQuery for &W {
    fn is_open_space(&self, cell: Cell) -> Result<bool, WorldQueryError> {
        (**self).is_open_space(cell)
    }

    fn has_solid_support_below(&self, cell: Cell) -> Result<bool, WorldQueryError> {
        (**self).has_solid_support_below(cell)
    }

    fn surface_kind(&self, cell: Cell) -> Result<SurfaceKind, WorldQueryError> {
        (**self).surface_kind(cell)
    }
}
