//! # Path Helpers
//!
//! Conversions between cells and world positions, plus path formatting.

use super::math::WorldPos;
use crate::config;
use crate::world::Cell;

/// The point an agent aims for when walking to a cell: horizontal center,
/// vertical floor.
pub fn cell_center(cell: Cell) -> WorldPos {
    WorldPos::new(cell.x as f64 + 0.5, cell.y as f64, cell.z as f64 + 0.5)
}

/// The cell containing a world position.
pub fn cell_at(pos: WorldPos) -> Cell {
    Cell::new(
        pos.x.floor() as i32,
        pos.y.floor() as i32,
        pos.z.floor() as i32,
    )
}

/// Whether two distinct cells touch, diagonals included.
pub fn are_adjacent(a: Cell, b: Cell) -> bool {
    a != b && a.chebyshev_distance(b) == 1
}

/// Cost of a single move between adjacent cells.
///
/// Horizontal diagonals cost √2 whatever their vertical offset; every other
/// move costs 1.
pub fn step_cost(from: Cell, to: Cell) -> f64 {
    if from.x != to.x && from.z != to.z {
        config::DIAGONAL_COST
    } else {
        config::STRAIGHT_COST
    }
}

/// Human-readable rendering of a path.
///
/// # Examples
///
/// ```
/// use voxpath::{format_path, Cell};
///
/// assert_eq!(format_path(&[]), "Empty path");
/// assert_eq!(
///     format_path(&[Cell::new(0, 1, 0), Cell::new(1, 1, 0)]),
///     "Path: (0, 1, 0) → (1, 1, 0)"
/// );
/// ```
pub fn format_path(cells: &[Cell]) -> String {
    if cells.is_empty() {
        return "Empty path".to_string();
    }
    let steps: Vec<String> = cells.iter().map(Cell::to_string).collect();
    format!("Path: {}", steps.join(" → "))
}
