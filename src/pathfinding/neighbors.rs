//! Neighbor generation rules.
//!
//! Two mutually exclusive rule sets are supported:
//!
//! - [`NeighborPolicy::Simple`]: the six face neighbors, each valid when it
//!   is open space resting on solid support
//! - [`NeighborPolicy::Enhanced`]: the eight horizontal directions at the
//!   same level, one up and one down, with headroom, step-up and
//!   corner-cutting checks

use crate::utils::step_cost;
use crate::world::{Cell, SurfaceKind, WorldQuery};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Face offsets in the order the simple policy visits them: up, down, east,
/// west, south, north.
const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (0, 1, 0),
    (0, -1, 0),
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Horizontal offsets `(dx, dz)`: the four cardinals, then the diagonals.
const HORIZONTAL_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Vertical offsets tried for every horizontal direction.
const VERTICAL_OFFSETS: [i32; 3] = [0, 1, -1];

/// Which cells count as neighbors during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborPolicy {
    /// 6-connected, open space with support below
    Simple,
    /// 8 horizontal directions across three levels with step rules
    #[default]
    Enhanced,
}

impl NeighborPolicy {
    /// Appends every valid neighbor of `cell` with its move cost to `out`.
    ///
    /// The order is fixed for a given world, which keeps searches
    /// reproducible.
    pub fn neighbors<W: WorldQuery + ?Sized>(
        self,
        world: &W,
        cell: Cell,
        out: &mut Vec<(Cell, f64)>,
    ) {
        match self {
            NeighborPolicy::Simple => simple_neighbors(world, cell, out),
            NeighborPolicy::Enhanced => enhanced_neighbors(world, cell, out),
        }
    }

    /// Largest number of neighbors a cell can have under this policy.
    pub fn max_degree(self) -> usize {
        match self {
            NeighborPolicy::Simple => FACE_OFFSETS.len(),
            NeighborPolicy::Enhanced => HORIZONTAL_OFFSETS.len() * VERTICAL_OFFSETS.len(),
        }
    }
}

impl fmt::Display for NeighborPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborPolicy::Simple => write!(f, "simple"),
            NeighborPolicy::Enhanced => write!(f, "enhanced"),
        }
    }
}

impl FromStr for NeighborPolicy {
    type Err = crate::VoxPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(NeighborPolicy::Simple),
            "enhanced" => Ok(NeighborPolicy::Enhanced),
            other => Err(crate::VoxPathError::InvalidConfig(format!(
                "unknown neighbor policy '{}'",
                other
            ))),
        }
    }
}

fn simple_neighbors<W: WorldQuery + ?Sized>(world: &W, cell: Cell, out: &mut Vec<(Cell, f64)>) {
    for (dx, dy, dz) in FACE_OFFSETS {
        let target = cell.offset(dx, dy, dz);
        if world.query_open(target) && world.query_support(target) {
            out.push((target, step_cost(cell, target)));
        }
    }
}

fn enhanced_neighbors<W: WorldQuery + ?Sized>(world: &W, cell: Cell, out: &mut Vec<(Cell, f64)>) {
    for (dx, dz) in HORIZONTAL_OFFSETS {
        for dy in VERTICAL_OFFSETS {
            let target = cell.offset(dx, dy, dz);
            let reachable = match dy {
                1 => can_step_up(world, cell, target),
                _ => world.is_walkable(target),
            };
            if !reachable {
                continue;
            }
            if dx != 0 && dz != 0 && !corners_clear(world, cell, dx, dy, dz) {
                continue;
            }
            out.push((target, step_cost(cell, target)));
        }
    }
}

/// A rise of one cell needs an open target and either a step-capable surface
/// under the agent, or solid support at the target plus headroom two cells
/// above the current position.
fn can_step_up<W: WorldQuery + ?Sized>(world: &W, from: Cell, target: Cell) -> bool {
    if !world.query_open(target) {
        return false;
    }
    world.query_surface(from) == SurfaceKind::StepCapable
        || (world.query_support(target) && world.query_open(from.offset(0, 2, 0)))
}

/// Both axis-aligned cells flanking a diagonal move, taken at the target's
/// level, must be walkable.
fn corners_clear<W: WorldQuery + ?Sized>(world: &W, from: Cell, dx: i32, dy: i32, dz: i32) -> bool {
    world.is_walkable(from.offset(dx, dy, 0)) && world.is_walkable(from.offset(0, dy, dz))
}
