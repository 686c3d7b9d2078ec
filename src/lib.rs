#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod command;
pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod paint;
pub mod palette;
pub mod panels;
pub mod selection;
pub mod state;
pub mod surface;
pub mod tools;
pub mod util;

pub use app::PaintApp;
pub use color::Color;
pub use command::{Command, CommandError, CommandHistory, CommandResult};
pub use config::{EditorConfig, ToolSettings};
pub use input::{InputEvent, Key};
pub use state::EditorContext;
pub use surface::Surface;
pub use tools::{Tool, ToolKind, ToolType};
