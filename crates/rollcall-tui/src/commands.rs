//! Command parsing for the input line.
//!
//! This module parses command strings into structured [`Command`] values.
//! Positions are 1-based, as shown in the node table.

use rollcall_app::AppEvent;
use rollcall_core::{Direction, Intent};

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register, or unregister if already registered.
    Register,

    /// Flip the global status flag.
    Status,

    /// Move the node at a position one step up.
    Up {
        /// 1-based position.
        position: usize,
    },

    /// Move the node at a position one step down.
    Down {
        /// 1-based position.
        position: usize,
    },

    /// Move a node between two positions.
    Move {
        /// 1-based current position.
        from: usize,
        /// 1-based target position.
        to: usize,
    },

    /// Refresh now.
    Refresh,

    /// Quit the application.
    Quit,

    /// Nothing was typed.
    Empty,

    /// Unknown or invalid command.
    Unknown {
        /// The original input.
        input: String,
    },

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

impl Command {
    /// Event to feed the runtime, if the command is valid.
    pub fn into_event(self) -> Option<AppEvent> {
        let intent = match self {
            Self::Register => Intent::ToggleRegistration,
            Self::Status => Intent::ToggleStatus,
            Self::Up { position } => Intent::Step { index: position - 1, direction: Direction::Up },
            Self::Down { position } => {
                Intent::Step { index: position - 1, direction: Direction::Down }
            },
            Self::Move { from, to } => Intent::Reorder { cur: from - 1, new: to - 1 },
            Self::Refresh => return Some(AppEvent::RefreshRequested),
            Self::Quit => return Some(AppEvent::Quit),
            Self::Empty | Self::Unknown { .. } | Self::InvalidArgs { .. } => return None,
        };
        Some(AppEvent::Intent(intent))
    }

    /// Message for commands that could not be parsed.
    pub fn error(&self) -> Option<String> {
        match self {
            Self::Unknown { input } => Some(format!("Unknown command: {input}")),
            Self::InvalidArgs { command, error } => Some(format!("/{command}: {error}")),
            _ => None,
        }
    }
}

/// Parse a user input string into a command.
///
/// Commands start with `/`.
pub fn parse(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() {
        return Command::Empty;
    }

    let Some(cmd_str) = input.strip_prefix('/') else {
        return Command::Unknown { input: input.to_string() };
    };

    let parts: Vec<&str> = cmd_str.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");

    match command {
        "register" | "r" => Command::Register,

        "status" | "s" => Command::Status,

        "up" => match position(parts.get(1).copied(), "up") {
            Ok(position) => Command::Up { position },
            Err(invalid) => invalid,
        },

        "down" => match position(parts.get(1).copied(), "down") {
            Ok(position) => Command::Down { position },
            Err(invalid) => invalid,
        },

        "move" => {
            let from = position(parts.get(1).copied(), "move");
            let to = position(parts.get(2).copied(), "move");
            match (from, to) {
                (Ok(from), Ok(to)) => Command::Move { from, to },
                (Err(invalid), _) | (_, Err(invalid)) => invalid,
            }
        },

        "refresh" => Command::Refresh,

        "quit" | "q" => Command::Quit,

        _ => Command::Unknown { input: input.to_string() },
    }
}

fn position(arg: Option<&str>, command: &str) -> Result<usize, Command> {
    let invalid = |error: &str| Command::InvalidArgs { command: command.into(), error: error.into() };
    let Some(arg) = arg else {
        let usage = match command {
            "move" => "Usage: /move <from> <to>".to_string(),
            _ => format!("Usage: /{command} <position>"),
        };
        return Err(invalid(&usage));
    };
    match arg.parse::<usize>() {
        Ok(0) | Err(_) => Err(invalid("Positions start at 1")),
        Ok(position) => Ok(position),
    }
}
