//! # Executor Module
//!
//! Tick-driven path following.
//!
//! A [`PathExecutor`] owns one execution session: the active path, the index
//! of the waypoint being pursued and whether the session is live. Each host
//! tick it checks arrival at the current waypoint, advances when reached and
//! turns the vector to the waypoint into a [`MovementIntent`]. Horizontal
//! correction is done purely through yaw; strafe and back keys are never
//! pressed.
//!
//! Only the tick loop mutates the waypoint index. Other callers restrict
//! themselves to [`PathExecutor::start_path`] and [`PathExecutor::stop_path`].

pub mod intent;

pub use intent::*;

use crate::pathfinding::Path;
use crate::utils::{cell_at, cell_center, yaw_towards, WorldPos};
use crate::world::{Cardinal, Cell, WorldQuery};
use crate::{config, VoxPathError, VoxPathResult};
use log::{info, trace};
use serde::{Deserialize, Serialize};

/// Tuning for path following.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Distance to a waypoint center that counts as reached
    pub arrival_threshold: f64,
    /// Ticks after a jump during which no new jump is emitted
    pub jump_cooldown_ticks: u32,
    /// Target height above the feet that triggers a jump
    pub ascent_threshold: f64,
    /// Target height below the feet that triggers the edge probe
    pub descent_threshold: f64,
    /// How far below the feet the edge probe starts
    pub edge_probe_drop: f64,
}

impl ExecutorConfig {
    /// Checks that thresholds have usable signs.
    pub fn validate(&self) -> VoxPathResult<()> {
        if self.arrival_threshold.is_nan() || self.arrival_threshold <= 0.0 {
            return Err(VoxPathError::InvalidConfig(format!(
                "arrival_threshold must be positive, got {}",
                self.arrival_threshold
            )));
        }
        if self.descent_threshold > 0.0 {
            return Err(VoxPathError::InvalidConfig(format!(
                "descent_threshold must not be positive, got {}",
                self.descent_threshold
            )));
        }
        if self.ascent_threshold < 0.0 {
            return Err(VoxPathError::InvalidConfig(format!(
                "ascent_threshold must not be negative, got {}",
                self.ascent_threshold
            )));
        }
        Ok(())
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: config::ARRIVAL_THRESHOLD,
            jump_cooldown_ticks: config::JUMP_COOLDOWN_TICKS,
            ascent_threshold: config::ASCENT_THRESHOLD,
            descent_threshold: config::DESCENT_THRESHOLD,
            edge_probe_drop: config::EDGE_PROBE_DROP,
        }
    }
}

/// Where the executor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorPhase {
    /// No session, or the session was stopped
    Idle,
    /// Walking toward the current waypoint
    Following,
    /// The last waypoint was reached; no longer executing. Falls back to
    /// `Idle` on the next tick.
    Arrived,
}

/// State of one path-following session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionState {
    pub path: Path,
    pub current_index: usize,
    pub is_executing: bool,
}

/// Follows a path one tick at a time.
///
/// # Examples
///
/// ```
/// use voxpath::{AgentState, Cell, Path, PathExecutor, VoxelGrid};
///
/// let world = VoxelGrid::flat(4, 4, 4, 0);
/// let mut executor = PathExecutor::default();
/// executor.start_path(Path::from(vec![Cell::new(0, 1, 0), Cell::new(1, 1, 0)]));
///
/// // Standing on the first waypoint advances to the second.
/// let intent = executor.tick(&world, Some(AgentState::new(0.5, 1.0, 0.5, 0.0)));
/// assert_eq!(executor.current_target(), Some(Cell::new(1, 1, 0)));
/// assert!(intent.forward);
/// ```
#[derive(Debug, Clone)]
pub struct PathExecutor {
    config: ExecutorConfig,
    state: ExecutionState,
    phase: ExecutorPhase,
    jump_cooldown: u32,
    last_intent: MovementIntent,
}

impl Default for PathExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl PathExecutor {
    /// Creates an idle executor.
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            state: ExecutionState::default(),
            phase: ExecutorPhase::Idle,
            jump_cooldown: 0,
            last_intent: MovementIntent::idle(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Replaces the session with a new path and starts following it from the
    /// first waypoint. Previously emitted keys are released.
    pub fn start_path(&mut self, path: Path) {
        info!("Starting path with {} waypoints", path.len());
        self.state = ExecutionState {
            path,
            current_index: 0,
            is_executing: true,
        };
        self.phase = ExecutorPhase::Following;
        self.jump_cooldown = 0;
        self.last_intent = MovementIntent::idle();
    }

    /// Stops following and resets the emitted intent to idle. Calling it
    /// again is harmless.
    ///
    /// Keys already held by the host stay down until it applies an idle
    /// intent; [`stop_path_with`](Self::stop_path_with) does both.
    pub fn stop_path(&mut self) {
        if self.state.is_executing {
            info!(
                "Stopping path at waypoint {}/{}",
                self.state.current_index,
                self.state.path.len()
            );
        }
        self.state.is_executing = false;
        self.phase = ExecutorPhase::Idle;
        self.last_intent = MovementIntent::idle();
    }

    /// Stops following and releases every key on the host's actuator.
    pub fn stop_path_with<A: MovementActuator + ?Sized>(&mut self, actuator: &mut A) {
        self.stop_path();
        actuator.release_all();
    }

    /// Whether a session is live.
    pub fn is_executing_path(&self) -> bool {
        self.state.is_executing
    }

    /// Active path while executing.
    pub fn current_path(&self) -> Option<&Path> {
        self.state.is_executing.then_some(&self.state.path)
    }

    /// Waypoint currently pursued while executing.
    pub fn current_target(&self) -> Option<Cell> {
        if !self.state.is_executing {
            return None;
        }
        self.state.path.get(self.state.current_index)
    }

    /// Index of the waypoint currently pursued.
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> ExecutorPhase {
        self.phase
    }

    /// Session state, for inspection.
    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Intent emitted by the most recent tick, or idle after a start or stop.
    pub fn current_intent(&self) -> MovementIntent {
        self.last_intent
    }

    /// Ticks remaining before another jump may be emitted.
    pub fn jump_cooldown(&self) -> u32 {
        self.jump_cooldown
    }

    /// Advances the session by one tick and returns the keys to hold.
    ///
    /// Returns an idle intent when not executing, when the path is empty or
    /// when the agent's state is unavailable. A session that arrived on the
    /// previous tick goes back to [`ExecutorPhase::Idle`].
    pub fn tick<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        agent: Option<AgentState>,
    ) -> MovementIntent {
        if self.phase == ExecutorPhase::Arrived {
            self.phase = ExecutorPhase::Idle;
        }
        let intent = self.step(world, agent);
        self.last_intent = intent;
        intent
    }

    /// Ticks and hands the resulting intent to the host's actuator.
    pub fn drive<W, A>(&mut self, world: &W, agent: Option<AgentState>, actuator: &mut A) -> MovementIntent
    where
        W: WorldQuery + ?Sized,
        A: MovementActuator + ?Sized,
    {
        let intent = self.tick(world, agent);
        actuator.apply(&intent);
        intent
    }

    fn step<W: WorldQuery + ?Sized>(&mut self, world: &W, agent: Option<AgentState>) -> MovementIntent {
        if !self.state.is_executing || self.state.path.is_empty() {
            return MovementIntent::idle();
        }
        let Some(agent) = agent else {
            return MovementIntent::idle();
        };

        let Some(mut waypoint) = self.state.path.get(self.state.current_index) else {
            self.finish();
            return MovementIntent::idle();
        };

        let mut target = cell_center(waypoint);
        if agent.position.distance(target) < self.config.arrival_threshold {
            self.state.current_index += 1;
            self.jump_cooldown = 0;
            trace!(
                "Reached waypoint {} ({}/{})",
                waypoint,
                self.state.current_index,
                self.state.path.len()
            );
            match self.state.path.get(self.state.current_index) {
                Some(next) => {
                    waypoint = next;
                    target = cell_center(waypoint);
                }
                None => {
                    self.finish();
                    return MovementIntent::idle();
                }
            }
        }

        let intent = self.steer(world, agent, target);
        trace!("Tick toward {}: {:?}", waypoint, intent);

        if self.jump_cooldown > 0 {
            self.jump_cooldown -= 1;
        }
        intent
    }

    fn steer<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        agent: AgentState,
        target: WorldPos,
    ) -> MovementIntent {
        let delta = target - agent.position;
        let yaw = yaw_towards(delta.x, delta.z);

        let jump = if delta.y > self.config.ascent_threshold && self.jump_cooldown == 0 {
            self.jump_cooldown = self.config.jump_cooldown_ticks;
            true
        } else {
            false
        };

        let sneak = delta.y < self.config.descent_threshold && self.is_at_edge(world, agent.position, yaw);

        MovementIntent {
            forward: true,
            back: false,
            left: false,
            right: false,
            jump,
            sneak,
            yaw: Some(yaw),
        }
    }

    /// Whether the cell ahead (rounded to a cardinal from `yaw`) lacks solid
    /// support beneath it.
    fn is_at_edge<W: WorldQuery + ?Sized>(&self, world: &W, feet: WorldPos, yaw: f64) -> bool {
        let probe = cell_at(WorldPos::new(feet.x, feet.y - self.config.edge_probe_drop, feet.z));
        let front = probe + Cardinal::from_yaw(yaw).to_delta();
        !world.query_support(front)
    }

    fn finish(&mut self) {
        info!("Path complete after {} waypoints", self.state.path.len());
        self.state.is_executing = false;
        self.phase = ExecutorPhase::Arrived;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Block, VoxelGrid};

    fn two_step_path() -> Path {
        Path::from(vec![Cell::new(0, 1, 0), Cell::new(1, 1, 0)])
    }

    fn at_center(cell: Cell) -> AgentState {
        let center = cell_center(cell);
        AgentState::new(center.x, center.y, center.z, 0.0)
    }

    #[test]
    fn test_idle_executor_is_noop() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut executor = PathExecutor::default();
        assert!(!executor.is_executing_path());
        assert_eq!(executor.phase(), ExecutorPhase::Idle);
        assert!(executor.tick(&world, Some(at_center(Cell::new(0, 1, 0)))).is_idle());
        assert!(executor.current_path().is_none());
        assert!(executor.current_target().is_none());
    }

    #[test]
    fn test_missing_agent_is_noop() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(two_step_path());
        assert!(executor.tick(&world, None).is_idle());
        assert_eq!(executor.current_index(), 0);
        assert!(executor.is_executing_path());
    }

    #[test]
    fn test_empty_path_is_noop() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(Path::empty());
        assert!(executor.tick(&world, Some(AgentState::default())).is_idle());
        assert!(executor.current_target().is_none());
    }

    #[test]
    fn test_arrival_advances_without_finishing() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(two_step_path());

        let intent = executor.tick(&world, Some(at_center(Cell::new(0, 1, 0))));
        assert_eq!(executor.current_index(), 1);
        assert!(executor.is_executing_path());
        assert_eq!(executor.current_target(), Some(Cell::new(1, 1, 0)));

        // Next waypoint is due east.
        assert!(intent.forward);
        assert_eq!(intent.yaw, Some(-90.0));
    }

    #[test]
    fn test_completion_then_noop() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(two_step_path());

        executor.tick(&world, Some(at_center(Cell::new(0, 1, 0))));
        let intent = executor.tick(&world, Some(at_center(Cell::new(1, 1, 0))));
        assert!(intent.is_idle());
        assert!(!executor.is_executing_path());
        assert_eq!(executor.phase(), ExecutorPhase::Arrived);
        assert!(executor.current_path().is_none());

        assert!(executor.tick(&world, Some(at_center(Cell::new(1, 1, 0)))).is_idle());
        assert_eq!(executor.current_index(), 2);
        assert_eq!(executor.phase(), ExecutorPhase::Idle);
    }

    #[test]
    fn test_strafe_keys_never_pressed() {
        let world = VoxelGrid::flat(6, 4, 6, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(Path::from(vec![Cell::new(4, 1, 4)]));

        for yaw in [-170.0, -45.0, 0.0, 90.0] {
            let intent = executor.tick(&world, Some(AgentState::new(0.5, 1.0, 0.5, yaw)));
            assert!(intent.forward);
            assert!(!intent.back && !intent.left && !intent.right);
        }
    }

    #[test]
    fn test_jump_cooldown() {
        let world = VoxelGrid::flat(4, 6, 4, 0);
        let mut executor = PathExecutor::default();
        // Target one block up, out of arrival range.
        executor.start_path(Path::from(vec![Cell::new(3, 2, 0)]));
        let agent = Some(AgentState::new(0.5, 1.0, 0.5, 0.0));

        assert!(executor.tick(&world, agent).jump);
        for tick in 1..=9 {
            assert!(!executor.tick(&world, agent).jump, "jumped on tick {}", tick);
        }
        assert!(executor.tick(&world, agent).jump);
    }

    #[test]
    fn test_custom_config_cooldown_and_threshold() {
        let config = ExecutorConfig {
            jump_cooldown_ticks: 3,
            arrival_threshold: 0.2,
            ..ExecutorConfig::default()
        };
        assert!(config.validate().is_ok());

        let world = VoxelGrid::flat(4, 6, 4, 0);
        let mut executor = PathExecutor::new(config);
        executor.start_path(Path::from(vec![Cell::new(3, 2, 0)]));
        let agent = Some(AgentState::new(0.5, 1.0, 0.5, 0.0));

        assert!(executor.tick(&world, agent).jump);
        assert!(!executor.tick(&world, agent).jump);
        assert!(!executor.tick(&world, agent).jump);
        assert!(executor.tick(&world, agent).jump);

        // 0.3 from the first waypoint center: inside the default threshold only.
        let path = Path::from(vec![Cell::new(1, 1, 0), Cell::new(2, 1, 0)]);
        let near = Some(AgentState::new(1.8, 1.0, 0.5, 0.0));

        let mut strict = PathExecutor::new(config);
        strict.start_path(path.clone());
        strict.tick(&world, near);
        assert_eq!(strict.current_target(), Some(Cell::new(1, 1, 0)));

        let mut lenient = PathExecutor::default();
        lenient.start_path(path);
        lenient.tick(&world, near);
        assert_eq!(lenient.current_target(), Some(Cell::new(2, 1, 0)));
    }

    #[test]
    fn test_arrival_resets_jump_cooldown() {
        let world = VoxelGrid::flat(4, 6, 4, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(Path::from(vec![
            Cell::new(0, 1, 0),
            Cell::new(1, 2, 0),
            Cell::new(2, 3, 0),
        ]));

        // Far from the first waypoint but below it: jump and arm the cooldown.
        assert!(executor.tick(&world, Some(AgentState::new(0.5, 0.5, 2.5, 0.0))).jump);
        assert!(executor.jump_cooldown() > 0);

        // Arriving at the first waypoint clears the cooldown, so the rise to
        // the second waypoint jumps immediately.
        assert!(executor.tick(&world, Some(at_center(Cell::new(0, 1, 0)))).jump);
    }

    #[test]
    fn test_descent_sneaks_at_edge() {
        // Agent on a raised platform at x = 0..=1, two-block drop to the east.
        let mut world = VoxelGrid::new(5, 5, 3);
        world.fill(Cell::new(0, 0, 0), Cell::new(4, 0, 2), Block::Solid).unwrap();
        world.fill(Cell::new(0, 1, 0), Cell::new(1, 2, 2), Block::Solid).unwrap();

        let mut executor = PathExecutor::default();
        executor.start_path(Path::from(vec![Cell::new(3, 1, 1)]));

        // Feet at y = 3 on the platform edge, facing east toward the drop.
        let intent = executor.tick(&world, Some(AgentState::new(1.5, 3.0, 1.5, 0.0)));
        assert!(intent.forward);
        assert!(intent.sneak);
    }

    #[test]
    fn test_descent_without_edge_does_not_sneak() {
        let world = VoxelGrid::flat(6, 6, 3, 2);
        let mut executor = PathExecutor::default();
        executor.start_path(Path::from(vec![Cell::new(4, 1, 1)]));

        // Target is well below but the ground ahead is continuous.
        let intent = executor.tick(&world, Some(AgentState::new(1.5, 3.0, 1.5, 0.0)));
        assert!(intent.forward);
        assert!(!intent.sneak);
    }

    #[test]
    fn test_start_path_resets_session() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut executor = PathExecutor::default();
        executor.start_path(two_step_path());
        executor.tick(&world, Some(at_center(Cell::new(0, 1, 0))));
        assert!(!executor.current_intent().is_idle());

        executor.start_path(Path::from(vec![Cell::new(3, 1, 3)]));
        assert_eq!(executor.current_index(), 0);
        assert!(executor.current_intent().is_idle());
        assert_eq!(executor.current_target(), Some(Cell::new(3, 1, 3)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut executor = PathExecutor::default();
        executor.start_path(two_step_path());
        executor.stop_path();
        executor.stop_path();
        assert!(!executor.is_executing_path());
        assert_eq!(executor.phase(), ExecutorPhase::Idle);
        assert!(executor.current_intent().is_idle());
    }

    #[test]
    fn test_stop_with_actuator_releases_keys() {
        #[derive(Default)]
        struct Keys {
            applied: Vec<MovementIntent>,
        }

        impl MovementActuator for Keys {
            fn apply(&mut self, intent: &MovementIntent) {
                self.applied.push(*intent);
            }
        }

        let world = VoxelGrid::flat(6, 4, 6, 0);
        let mut executor = PathExecutor::default();
        let mut keys = Keys::default();
        executor.start_path(Path::from(vec![Cell::new(4, 1, 0)]));
        executor.drive(&world, Some(AgentState::new(0.5, 1.0, 0.5, 0.0)), &mut keys);
        assert!(keys.applied[0].forward);

        executor.stop_path_with(&mut keys);
        assert!(!executor.is_executing_path());
        assert_eq!(executor.phase(), ExecutorPhase::Idle);
        assert_eq!(keys.applied.len(), 2);
        assert!(keys.applied[1].is_idle());
    }

    #[test]
    fn test_config_validation() {
        assert!(ExecutorConfig::default().validate().is_ok());
        let bad = ExecutorConfig {
            arrival_threshold: 0.0,
            ..ExecutorConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = ExecutorConfig {
            descent_threshold: 0.5,
            ..ExecutorConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
