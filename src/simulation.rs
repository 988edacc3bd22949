//! # Simulation
//!
//! A small kinematic agent that consumes [`MovementIntent`]s, so a full
//! search-then-follow run can be exercised without a game engine.
//!
//! The model is coarse: the agent turns instantly to the
//! requested yaw, walks a fixed distance per tick while `forward` is held,
//! rises one block only while airborne after a jump (or from a slab), and
//! falls straight down when it walks off support.

use crate::commands::Navigator;
use crate::executor::{AgentState, ExecutorPhase, MovementActuator, MovementIntent};
use crate::utils::{cell_at, facing_vector, WorldPos};
use crate::world::{Cell, SurfaceKind, WorldQuery};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Blocks walked per tick.
const WALK_SPEED: f64 = 0.25;

/// Blocks walked per tick while sneaking.
const SNEAK_SPEED: f64 = 0.1;

/// Ticks during which a jump lets the agent climb one block.
const AIRBORNE_TICKS: u32 = 6;

/// Kinematic stand-in for a player.
pub struct KinematicAgent<'w, W: WorldQuery + ?Sized> {
    world: &'w W,
    state: AgentState,
    airborne: u32,
}

impl<'w, W: WorldQuery + ?Sized> KinematicAgent<'w, W> {
    /// Places an agent at the floor center of a cell.
    pub fn new(world: &'w W, cell: Cell) -> Self {
        Self {
            world,
            state: AgentState::new(cell.x as f64 + 0.5, cell.y as f64, cell.z as f64 + 0.5, 0.0),
            airborne: 0,
        }
    }

    /// Current position and facing.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Cell containing the agent's feet.
    pub fn cell(&self) -> Cell {
        cell_at(self.state.position)
    }

    fn settle(&self, cell: Cell) -> Option<Cell> {
        if self.world.is_walkable(cell) {
            return Some(cell);
        }
        let climbing = self.airborne > 0
            || self.world.query_surface(self.cell()) == SurfaceKind::StepCapable;
        if climbing && self.world.query_open(cell.up()) && self.world.is_walkable(cell.up()) {
            return Some(cell.up());
        }
        if !self.world.query_open(cell) || !self.world.query_open(cell.up()) {
            return None;
        }
        // Open but unsupported: fall until something holds us.
        let mut below = cell;
        while below.y > 0 && !self.world.query_support(below) {
            below = below.down();
            if !self.world.query_open(below) {
                return None;
            }
        }
        self.world.is_walkable(below).then_some(below)
    }
}

impl<W: WorldQuery + ?Sized> MovementActuator for KinematicAgent<'_, W> {
    fn apply(&mut self, intent: &MovementIntent) {
        if let Some(yaw) = intent.yaw {
            self.state.yaw = yaw;
        }
        if intent.jump && self.airborne == 0 {
            self.airborne = AIRBORNE_TICKS;
        }

        if intent.forward {
            let speed = if intent.sneak { SNEAK_SPEED } else { WALK_SPEED };
            let (fx, fz) = facing_vector(self.state.yaw);
            let moved = WorldPos::new(
                self.state.position.x + fx * speed,
                self.state.position.y,
                self.state.position.z + fz * speed,
            );
            let from = self.cell();
            let to = cell_at(moved);
            if to == from {
                self.state.position = moved;
            } else if let Some(landing) = self.settle(to) {
                self.state.position = WorldPos::new(moved.x, landing.y as f64, moved.z);
            }
        }

        if self.airborne > 0 {
            self.airborne -= 1;
        }
    }
}

/// Summary of a simulated navigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Ticks run
    pub ticks: u32,
    /// Whether the executor reached the end of its path
    pub arrived: bool,
    /// Where the agent ended up
    pub final_position: WorldPos,
}

/// Ticks a navigator against a kinematic agent until the path completes or
/// `max_ticks` runs out.
pub fn run_simulation<W: WorldQuery + ?Sized>(
    world: &W,
    navigator: &mut Navigator,
    agent: &mut KinematicAgent<'_, W>,
    max_ticks: u32,
) -> SimulationReport {
    let mut ticks = 0;
    while ticks < max_ticks && navigator.executor().is_executing_path() {
        let intent = navigator.executor_mut().drive(world, Some(agent.state()), agent);
        ticks += 1;
        if ticks % 20 == 0 {
            debug!("tick {}: agent at {:?}, intent {:?}", ticks, agent.state().position, intent);
        }
    }
    agent.release_all();

    let arrived = navigator.executor().phase() == ExecutorPhase::Arrived;
    info!(
        "Simulation finished after {} ticks (arrived: {})",
        ticks, arrived
    );
    SimulationReport {
        ticks,
        arrived,
        final_position: agent.state().position,
    }
}
