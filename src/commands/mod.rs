//! # Commands Module
//!
//! Text command layer on top of the pathfinder and executor.
//!
//! The host delivers submitted chat text to [`Navigator::handle_text`]; the
//! returned [`CommandOutcome`] tells "no path found", "navigation stopped"
//! and "invalid coordinates" apart and renders the message to show the user.

pub mod parser;

pub use parser::*;

use crate::executor::{AgentState, MovementIntent, PathExecutor};
use crate::pathfinding::Pathfinder;
use crate::utils::cell_at;
use crate::world::{Cell, WorldQuery};
use crate::VoxPathError;
use log::{info, warn};
use std::fmt;

/// How a message should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Info,
}

/// Result of handling one piece of chat text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a command; leave the text to the chat system
    Ignored,
    /// A path was found and execution started
    PathFound { goal: Cell, waypoints: usize },
    /// The goal cannot be reached
    NoPathFound { goal: Cell },
    /// The host could not report where the agent is
    AgentUnavailable,
    /// An active navigation was cancelled
    NavigationStopped,
    /// Stop was requested with nothing running
    NotNavigating,
    /// The command list
    Help,
    /// `goto` with the wrong number of arguments
    Usage,
    /// `goto` with non-integer coordinates
    InvalidCoordinates,
    /// Unrecognized verb
    Unknown,
}

impl CommandOutcome {
    /// Presentation hint for the message.
    pub fn tone(&self) -> Tone {
        match self {
            CommandOutcome::PathFound { .. } => Tone::Success,
            CommandOutcome::NavigationStopped | CommandOutcome::NotNavigating => Tone::Warning,
            CommandOutcome::Help | CommandOutcome::Ignored => Tone::Info,
            CommandOutcome::NoPathFound { .. }
            | CommandOutcome::AgentUnavailable
            | CommandOutcome::Usage
            | CommandOutcome::InvalidCoordinates
            | CommandOutcome::Unknown => Tone::Error,
        }
    }

    /// Message lines to show the user.
    pub fn lines(&self) -> Vec<String> {
        match self {
            CommandOutcome::Ignored => Vec::new(),
            CommandOutcome::PathFound { goal, waypoints } => vec![
                format!("Finding path to {}...", goal),
                format!("Found path with {} nodes", waypoints),
            ],
            CommandOutcome::NoPathFound { goal } => vec![
                format!("Finding path to {}...", goal),
                "No path found to destination!".to_string(),
            ],
            CommandOutcome::AgentUnavailable => vec!["Player position unavailable".to_string()],
            CommandOutcome::NavigationStopped => vec!["Navigation stopped".to_string()],
            CommandOutcome::NotNavigating => vec!["No navigation in progress".to_string()],
            CommandOutcome::Help => HELP_LINES.iter().map(|line| line.to_string()).collect(),
            CommandOutcome::Usage => vec![GOTO_USAGE.to_string()],
            CommandOutcome::InvalidCoordinates => {
                vec!["Invalid coordinates! Use numbers.".to_string()]
            }
            CommandOutcome::Unknown => vec!["Unknown command. Try *help".to_string()],
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Search-then-follow driver owning one pathfinder and one execution
/// session.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    pathfinder: Pathfinder,
    executor: PathExecutor,
}

impl Navigator {
    /// Creates a navigator from its two components.
    pub fn new(pathfinder: Pathfinder, executor: PathExecutor) -> Self {
        Self {
            pathfinder,
            executor,
        }
    }

    /// The pathfinder.
    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// The execution session.
    pub fn executor(&self) -> &PathExecutor {
        &self.executor
    }

    /// Mutable access to the execution session.
    pub fn executor_mut(&mut self) -> &mut PathExecutor {
        &mut self.executor
    }

    /// Handles submitted chat text.
    pub fn handle_text<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        agent: Option<AgentState>,
        text: &str,
    ) -> CommandOutcome {
        let command = match NavCommand::parse(text) {
            None => return CommandOutcome::Ignored,
            Some(Ok(command)) => command,
            Some(Err(VoxPathError::InvalidCoordinates(arg))) => {
                warn!("Rejected coordinate '{}' in '{}'", arg, text.trim());
                return CommandOutcome::InvalidCoordinates;
            }
            Some(Err(VoxPathError::Usage(_))) => return CommandOutcome::Usage,
            Some(Err(e)) => {
                warn!("Rejected command '{}': {}", text.trim(), e);
                return CommandOutcome::Unknown;
            }
        };
        self.execute(world, agent, command)
    }

    /// Runs an already parsed command.
    pub fn execute<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        agent: Option<AgentState>,
        command: NavCommand,
    ) -> CommandOutcome {
        match command {
            NavCommand::Goto(goal) => match agent {
                Some(agent) => self.navigate(world, cell_at(agent.position), goal),
                None => CommandOutcome::AgentUnavailable,
            },
            NavCommand::Stop => {
                if self.executor.is_executing_path() {
                    self.executor.stop_path();
                    CommandOutcome::NavigationStopped
                } else {
                    CommandOutcome::NotNavigating
                }
            }
            NavCommand::Help => CommandOutcome::Help,
        }
    }

    /// Searches from `start` to `goal` and starts following the result.
    ///
    /// A failed search leaves any running session untouched.
    pub fn navigate<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        start: Cell,
        goal: Cell,
    ) -> CommandOutcome {
        let path = self.pathfinder.find_path(world, start, goal);
        if path.is_empty() {
            info!("No path from {} to {}", start, goal);
            return CommandOutcome::NoPathFound { goal };
        }
        let waypoints = path.len();
        self.executor.start_path(path);
        CommandOutcome::PathFound { goal, waypoints }
    }

    /// Advances the execution session by one host tick.
    pub fn tick<W: WorldQuery + ?Sized>(&mut self, world: &W, agent: Option<AgentState>) -> MovementIntent {
        self.executor.tick(world, agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Block, VoxelGrid};

    fn agent_at(x: f64, y: f64, z: f64) -> Option<AgentState> {
        Some(AgentState::new(x, y, z, 0.0))
    }

    #[test]
    fn test_goto_starts_execution() {
        let world = VoxelGrid::flat(10, 4, 10, 0);
        let mut navigator = Navigator::default();

        let outcome = navigator.handle_text(&world, agent_at(0.5, 1.0, 0.5), "*goto 5 1 5");
        assert_eq!(
            outcome,
            CommandOutcome::PathFound {
                goal: Cell::new(5, 1, 5),
                waypoints: 6
            }
        );
        assert_eq!(outcome.tone(), Tone::Success);
        assert!(navigator.executor().is_executing_path());
        assert_eq!(outcome.lines()[1], "Found path with 6 nodes");
    }

    #[test]
    fn test_goto_unreachable() {
        let mut world = VoxelGrid::flat(10, 4, 10, 0);
        world.fill(Cell::new(7, 1, 0), Cell::new(7, 3, 9), Block::Solid).unwrap();
        let mut navigator = Navigator::default();

        let outcome = navigator.handle_text(&world, agent_at(0.5, 1.0, 0.5), "*goto 9 1 9");
        assert_eq!(outcome, CommandOutcome::NoPathFound { goal: Cell::new(9, 1, 9) });
        assert_eq!(outcome.tone(), Tone::Error);
        assert!(!navigator.executor().is_executing_path());
    }

    #[test]
    fn test_goto_without_agent() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut navigator = Navigator::default();
        assert_eq!(
            navigator.handle_text(&world, None, "*goto 1 1 1"),
            CommandOutcome::AgentUnavailable
        );
    }

    #[test]
    fn test_stop_outcomes_are_distinct() {
        let world = VoxelGrid::flat(10, 4, 10, 0);
        let mut navigator = Navigator::default();
        let agent = agent_at(0.5, 1.0, 0.5);

        assert_eq!(navigator.handle_text(&world, agent, "*stop"), CommandOutcome::NotNavigating);
        navigator.handle_text(&world, agent, "*goto 3 1 3");
        assert_eq!(
            navigator.handle_text(&world, agent, "*stop"),
            CommandOutcome::NavigationStopped
        );
        assert!(!navigator.executor().is_executing_path());
        assert!(navigator.tick(&world, agent).is_idle());
    }

    #[test]
    fn test_bad_input_outcomes() {
        let world = VoxelGrid::flat(4, 4, 4, 0);
        let mut navigator = Navigator::default();
        let agent = agent_at(0.5, 1.0, 0.5);

        assert_eq!(navigator.handle_text(&world, agent, "hi there"), CommandOutcome::Ignored);
        assert_eq!(navigator.handle_text(&world, agent, "*goto 1 2"), CommandOutcome::Usage);
        assert_eq!(
            navigator.handle_text(&world, agent, "*goto a b c"),
            CommandOutcome::InvalidCoordinates
        );
        assert_eq!(navigator.handle_text(&world, agent, "*dance"), CommandOutcome::Unknown);
    }

    #[test]
    fn test_goto_at_coordinate_limits_finds_no_path() {
        let world = VoxelGrid::flat(10, 4, 10, 0);
        let mut navigator = Navigator::default();
        let agent = agent_at(0.5, 1.0, 0.5);

        assert_eq!(
            navigator.handle_text(&world, agent, "*goto -2147483648 1 1"),
            CommandOutcome::NoPathFound {
                goal: Cell::new(i32::MIN, 1, 1)
            }
        );
        assert_eq!(
            navigator.handle_text(&world, agent, "*goto 2147483647 2147483647 -2147483648"),
            CommandOutcome::NoPathFound {
                goal: Cell::new(i32::MAX, i32::MAX, i32::MIN)
            }
        );
        assert!(!navigator.executor().is_executing_path());
    }

    #[test]
    fn test_help_lines() {
        let outcome = CommandOutcome::Help;
        assert_eq!(outcome.lines().len(), 4);
        assert!(outcome.to_string().starts_with("=== Navigation Commands ==="));
    }
}
