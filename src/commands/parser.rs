//! # Command Parsing
//!
//! Turns chat text such as `*goto 10 64 -3` into a [`NavCommand`].

use crate::world::Cell;
use crate::{config, VoxPathError, VoxPathResult};

/// Usage line for the goto command.
pub const GOTO_USAGE: &str = "Usage: *goto <x> <y> <z>";

/// Lines shown by the help command.
pub const HELP_LINES: [&str; 4] = [
    "=== Navigation Commands ===",
    "*goto <x> <y> <z> - Navigate to coordinates",
    "*stop - Stop navigation",
    "*help - Show this help",
];

/// A recognized navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Walk to the given cell
    Goto(Cell),
    /// Cancel the active navigation
    Stop,
    /// List the commands
    Help,
}

impl NavCommand {
    /// Parses chat text.
    ///
    /// Returns `None` for text without the `*` prefix, which is ordinary chat.
    /// Verbs are case-insensitive and arguments are whitespace separated.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxpath::{Cell, NavCommand};
    ///
    /// let command = NavCommand::parse("*GOTO 4 65 -2").unwrap().unwrap();
    /// assert_eq!(command, NavCommand::Goto(Cell::new(4, 65, -2)));
    /// assert!(NavCommand::parse("hello").is_none());
    /// assert!(NavCommand::parse("*goto 1 2").unwrap().is_err());
    /// ```
    pub fn parse(text: &str) -> Option<VoxPathResult<NavCommand>> {
        let body = text.trim_start().strip_prefix(config::COMMAND_PREFIX)?;
        Some(Self::parse_body(body))
    }

    fn parse_body(body: &str) -> VoxPathResult<NavCommand> {
        let mut parts = body.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        match verb.as_str() {
            "goto" => {
                if args.len() != 3 {
                    return Err(VoxPathError::Usage(GOTO_USAGE.to_string()));
                }
                let x = parse_coordinate(args[0])?;
                let y = parse_coordinate(args[1])?;
                let z = parse_coordinate(args[2])?;
                Ok(NavCommand::Goto(Cell::new(x, y, z)))
            }
            "stop" => Ok(NavCommand::Stop),
            "help" => Ok(NavCommand::Help),
            other => Err(VoxPathError::InvalidCommand(format!(
                "unknown command '{}'",
                other
            ))),
        }
    }
}

fn parse_coordinate(text: &str) -> VoxPathResult<i32> {
    text.parse::<i32>()
        .map_err(|_| VoxPathError::InvalidCoordinates(text.to_string()))
}
