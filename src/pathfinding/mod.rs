//! # Pathfinding Module
//!
//! Weighted A* search over the voxel grid.
//!
//! Every call to [`Pathfinder::find_path`] builds its own node arena, open
//! set and closed set and drops them on return, so a single `Pathfinder` can
//! serve concurrent searches for different start/goal pairs.
//!
//! An unreachable goal is a normal outcome and yields an empty [`Path`].

pub mod neighbors;
pub mod node;
pub mod open_set;

pub use neighbors::*;
pub use node::*;
pub use open_set::*;

use crate::utils::{format_path, step_cost};
use crate::world::{Cell, WorldQuery};
use crate::{config, VoxPathError, VoxPathResult};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Configuration for the pathfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathfinderConfig {
    /// Neighbor rule set
    pub policy: NeighborPolicy,
    /// Stop and report no path after this many node expansions; `None`
    /// searches until the open set runs dry
    pub max_expansions: Option<usize>,
}

impl PathfinderConfig {
    /// Creates a configuration with the default expansion cap.
    pub fn new(policy: NeighborPolicy) -> Self {
        Self {
            policy,
            max_expansions: Some(config::DEFAULT_MAX_EXPANSIONS),
        }
    }

    /// 6-connected search.
    pub fn simple() -> Self {
        Self::new(NeighborPolicy::Simple)
    }

    /// Step-aware search across 8 horizontal directions.
    pub fn enhanced() -> Self {
        Self::new(NeighborPolicy::Enhanced)
    }

    /// Search with no expansion cap.
    pub fn unbounded(policy: NeighborPolicy) -> Self {
        Self {
            policy,
            max_expansions: None,
        }
    }

    /// Replaces the expansion cap.
    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Checks that the configuration can find any path at all.
    pub fn validate(&self) -> VoxPathResult<()> {
        if self.max_expansions == Some(0) {
            return Err(VoxPathError::InvalidConfig(
                "max_expansions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self::enhanced()
    }
}

/// Ordered waypoints from start to goal, both inclusive.
///
/// An empty path means no route was found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// Wraps a sequence of cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// The "no path" value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Waypoints in visiting order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Waypoint at an index.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// First waypoint.
    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    /// Last waypoint.
    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Iterates over the waypoints.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Sum of the per-step move costs along the path.
    pub fn total_cost(&self) -> f64 {
        self.cells
            .windows(2)
            .map(|pair| step_cost(pair[0], pair[1]))
            .sum()
    }
}

impl From<Vec<Cell>> for Path {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_path(&self.cells))
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes taken off the open set and expanded
    pub expanded: usize,
    /// Nodes created, replacements included
    pub generated: usize,
    /// Open entries replaced by a cheaper route
    pub decrease_keys: usize,
}

/// Full result of a search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchOutcome {
    /// Found path, empty when the goal was not reached
    pub path: Path,
    /// Accumulated cost of the goal node, when reached
    pub cost: Option<f64>,
    /// Search counters
    pub stats: SearchStats,
    /// Whether the search stopped because it hit the expansion cap
    pub exhausted: bool,
}

impl SearchOutcome {
    /// Whether a path was found.
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Weighted A* pathfinder.
///
/// # Examples
///
/// ```
/// use voxpath::{Cell, Pathfinder, VoxelGrid};
///
/// let world = VoxelGrid::flat(10, 4, 10, 0);
/// let path = Pathfinder::default().find_path(&world, Cell::new(0, 1, 0), Cell::new(5, 1, 5));
/// assert_eq!(path.start(), Some(Cell::new(0, 1, 0)));
/// assert_eq!(path.goal(), Some(Cell::new(5, 1, 5)));
/// assert!((path.total_cost() - 5.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pathfinder {
    config: PathfinderConfig,
}

impl Pathfinder {
    /// Creates a pathfinder with the given configuration.
    pub fn new(config: PathfinderConfig) -> Self {
        Self { config }
    }

    /// Creates a pathfinder for a neighbor policy with the default cap.
    pub fn with_policy(policy: NeighborPolicy) -> Self {
        Self::new(PathfinderConfig::new(policy))
    }

    /// Active configuration.
    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Finds a path from `start` to `goal`, or an empty path if there is
    /// none (or the expansion cap was hit first).
    pub fn find_path<W: WorldQuery + ?Sized>(&self, world: &W, start: Cell, goal: Cell) -> Path {
        self.search(world, start, goal).path
    }

    /// Runs the search and reports cost and counters alongside the path.
    pub fn search<W: WorldQuery + ?Sized>(&self, world: &W, start: Cell, goal: Cell) -> SearchOutcome {
        debug!(
            "Searching {} -> {} ({} policy)",
            start, goal, self.config.policy
        );

        let mut arena = NodeArena::new();
        let mut open = OpenSet::new();
        let mut closed: HashSet<Cell> = HashSet::new();
        let mut stats = SearchStats::default();
        let mut neighbors = Vec::with_capacity(self.config.policy.max_degree());

        let root = arena.push(Node::root(start, heuristic(start, goal)));
        open.insert(start, root, arena.get(root).f_cost());
        stats.generated += 1;

        while let Some(current_id) = open.pop() {
            let current = arena.get(current_id).clone();

            if current.cell == goal {
                let path = Path::new(arena.reconstruct(current_id));
                debug!(
                    "Found path with {} nodes, cost {:.3}, {} expansions",
                    path.len(),
                    current.g_cost,
                    stats.expanded
                );
                return SearchOutcome {
                    path,
                    cost: Some(current.g_cost),
                    stats,
                    exhausted: false,
                };
            }

            if let Some(cap) = self.config.max_expansions {
                if stats.expanded >= cap {
                    warn!(
                        "Search {} -> {} gave up after {} expansions",
                        start, goal, stats.expanded
                    );
                    return SearchOutcome {
                        stats,
                        exhausted: true,
                        ..SearchOutcome::default()
                    };
                }
            }

            closed.insert(current.cell);
            stats.expanded += 1;
            trace!(
                "Expanding {} g={:.3} f={:.3}",
                current.cell,
                current.g_cost,
                current.f_cost()
            );

            neighbors.clear();
            self.config.policy.neighbors(world, current.cell, &mut neighbors);

            for &(neighbor, move_cost) in &neighbors {
                if closed.contains(&neighbor) {
                    continue;
                }

                let tentative_g = current.g_cost + move_cost;

                if let Some(existing) = open.get(neighbor) {
                    if tentative_g >= arena.get(existing).g_cost {
                        continue;
                    }
                    open.remove(neighbor);
                    stats.decrease_keys += 1;
                }

                let node = Node {
                    cell: neighbor,
                    parent: Some(current_id),
                    g_cost: tentative_g,
                    h_cost: heuristic(neighbor, goal),
                };
                let f_cost = node.f_cost();
                let id = arena.push(node);
                open.insert(neighbor, id, f_cost);
                stats.generated += 1;
            }
        }

        debug!(
            "No path {} -> {} after {} expansions",
            start, goal, stats.expanded
        );
        SearchOutcome {
            stats,
            ..SearchOutcome::default()
        }
    }
}

/// Straight-line distance between two cells.
pub fn heuristic(from: Cell, to: Cell) -> f64 {
    from.euclidean_distance(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::are_adjacent;
    use crate::world::{Block, VoxelGrid};

    const SQRT_2: f64 = std::f64::consts::SQRT_2;

    fn flat_world() -> VoxelGrid {
        VoxelGrid::flat(10, 4, 10, 0)
    }

    #[test]
    fn test_start_equals_goal() {
        let world = flat_world();
        let cell = Cell::new(3, 1, 3);
        for policy in [NeighborPolicy::Simple, NeighborPolicy::Enhanced] {
            let path = Pathfinder::with_policy(policy).find_path(&world, cell, cell);
            assert_eq!(path.cells(), &[cell]);
        }
    }

    #[test]
    fn test_diagonal_optimal_on_flat_floor() {
        let world = flat_world();
        let outcome = Pathfinder::default().search(&world, Cell::new(0, 1, 0), Cell::new(5, 1, 5));

        assert!(outcome.found());
        assert!(outcome.path.len() <= 8);
        let cost = outcome.cost.unwrap();
        assert!((cost - 5.0 * SQRT_2).abs() < 1e-9);
        assert!((outcome.path.total_cost() - cost).abs() < 1e-9);
    }

    #[test]
    fn test_simple_policy_is_manhattan() {
        let world = flat_world();
        let outcome = Pathfinder::with_policy(NeighborPolicy::Simple).search(
            &world,
            Cell::new(0, 1, 0),
            Cell::new(3, 1, 4),
        );

        assert_eq!(outcome.path.len(), 8);
        assert_eq!(outcome.cost, Some(7.0));
        for pair in outcome.path.cells().windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut world = flat_world();
        let goal = Cell::new(5, 1, 5);
        world.fill(Cell::new(4, 1, 4), Cell::new(6, 3, 6), Block::Solid).unwrap();
        world.set(goal, Block::Air).unwrap();
        world.set(goal.up(), Block::Air).unwrap();

        for policy in [NeighborPolicy::Simple, NeighborPolicy::Enhanced] {
            let outcome = Pathfinder::with_policy(policy).search(&world, Cell::new(0, 1, 0), goal);
            assert!(outcome.path.is_empty());
            assert!(!outcome.exhausted);
            assert!(outcome.cost.is_none());
        }
    }

    #[test]
    fn test_goal_outside_world_is_unreachable() {
        let world = flat_world();
        let path = Pathfinder::default().find_path(&world, Cell::new(0, 1, 0), Cell::new(50, 1, 50));
        assert!(path.is_empty());
    }

    #[test]
    fn test_extreme_coordinates_are_unreachable() {
        let world = flat_world();
        let pathfinder = Pathfinder::default();
        let inside = Cell::new(1, 1, 1);

        for far in [
            Cell::new(i32::MIN, 1, 1),
            Cell::new(i32::MAX, 1, 1),
            Cell::new(1, i32::MIN, i32::MAX),
        ] {
            assert!(pathfinder.find_path(&world, inside, far).is_empty(), "goal {}", far);
            assert!(pathfinder.find_path(&world, far, inside).is_empty(), "start {}", far);
        }
    }

    #[test]
    fn test_detour_around_wall() {
        let mut world = flat_world();
        // Wall along x = 4 from z = 0 to z = 8, two blocks high.
        world.fill(Cell::new(4, 1, 0), Cell::new(4, 2, 8), Block::Solid).unwrap();

        let path = Pathfinder::default().find_path(&world, Cell::new(1, 1, 1), Cell::new(7, 1, 1));
        assert!(!path.is_empty());
        assert!(path.iter().any(|cell| cell.z == 9));
        for pair in path.cells().windows(2) {
            assert!(are_adjacent(pair[0], pair[1]));
            assert!(world.is_walkable(pair[1]));
        }
    }

    #[test]
    fn test_climbs_staircase() {
        let mut world = VoxelGrid::flat(8, 7, 3, 0);
        // Steps rising one block per column along +x.
        for x in 2..6 {
            world.fill(Cell::new(x, 1, 0), Cell::new(x, x - 1, 2), Block::Solid).unwrap();
        }
        let goal = Cell::new(5, 5, 1);
        let path = Pathfinder::default().find_path(&world, Cell::new(0, 1, 1), goal);

        assert_eq!(path.goal(), Some(goal));
        for pair in path.cells().windows(2) {
            assert!(pair[1].y - pair[0].y <= 1);
        }
    }

    #[test]
    fn test_expansion_cap_reports_exhaustion() {
        let world = flat_world();
        let config = PathfinderConfig::enhanced().with_max_expansions(Some(3));
        let outcome = Pathfinder::new(config).search(&world, Cell::new(0, 1, 0), Cell::new(9, 1, 9));

        assert!(outcome.path.is_empty());
        assert!(outcome.exhausted);
        assert_eq!(outcome.stats.expanded, 3);
    }

    #[test]
    fn test_unbounded_search_still_terminates_on_finite_world() {
        let world = flat_world();
        let config = PathfinderConfig::unbounded(NeighborPolicy::Enhanced);
        let path = Pathfinder::new(config).find_path(&world, Cell::new(0, 1, 0), Cell::new(9, 1, 0));
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn test_searches_are_deterministic() {
        let mut world = flat_world();
        world.fill(Cell::new(3, 1, 2), Cell::new(3, 2, 7), Block::Solid).unwrap();
        let pathfinder = Pathfinder::default();

        let first = pathfinder.find_path(&world, Cell::new(0, 1, 5), Cell::new(8, 1, 5));
        let second = pathfinder.find_path(&world, Cell::new(0, 1, 5), Cell::new(8, 1, 5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_validation() {
        assert!(PathfinderConfig::default().validate().is_ok());
        assert!(PathfinderConfig::unbounded(NeighborPolicy::Simple).validate().is_ok());
        assert!(PathfinderConfig::simple()
            .with_max_expansions(Some(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_path_display() {
        let path = Path::from(vec![Cell::new(0, 1, 0), Cell::new(1, 1, 1)]);
        assert_eq!(path.to_string(), "Path: (0, 1, 0) → (1, 1, 1)");
        assert_eq!(Path::empty().to_string(), "Empty path");
    }
}
