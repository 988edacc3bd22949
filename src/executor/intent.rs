//! Agent state in, movement intent out.

use crate::utils::WorldPos;
use serde::{Deserialize, Serialize};

/// What the executor needs to know about the agent each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Feet position in world coordinates
    pub position: WorldPos,
    /// Facing in degrees (0 faces `+z`, 90 faces `-x`)
    pub yaw: f64,
}

impl AgentState {
    /// Creates an agent state from raw coordinates.
    pub const fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self {
            position: WorldPos::new(x, y, z),
            yaw,
        }
    }
}

/// Key states and facing the host should apply for one tick.
///
/// The default value has every key released and no facing change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MovementIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sneak: bool,
    /// Facing to turn to, in degrees within `(-180, 180]`
    pub yaw: Option<f64>,
}

impl MovementIntent {
    /// All keys released.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Whether no key is pressed and no facing is requested.
    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }
}

/// Host-side sink for movement intents.
pub trait MovementActuator {
    /// Applies the key states and facing for the coming tick.
    fn apply(&mut self, intent: &MovementIntent);

    /// Releases every key.
    fn release_all(&mut self) {
        self.apply(&MovementIntent::idle());
    }
}
