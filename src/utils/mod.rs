//! # Utilities Module
//!
//! Movement mathematics and path helpers shared by the search, the executor
//! and the command layer.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use pathfinding::*;
