mod commands;
mod history;

use thiserror::Error;

pub use commands::{
    Command, EraseCommand, LineCommand, PaintCommand, SelectionCommand, ShapeCommand, ShapeStyle,
    StrokeCommand,
};
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A selection snapshot whose byte length does not match its dimensions.
    /// The canvas is left untouched when this is returned.
    #[error("malformed pixel snapshot: {width}x{height} needs {expected} bytes, got {actual}")]
    MalformedSnapshot {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
