//! Milli UI - Terminal rendering and input handling.
//!
//! This crate drives an [`milli_core::EditorSession`] from a raw-mode
//! terminal: bytes come in through a reader thread, frames go out as
//! queued crossterm commands.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod renderer;
pub mod status;
pub mod terminal;

pub use app::{run, EditorApp, HELP_MESSAGE};
pub use config::Config;
pub use error::{Error, Result};
pub use input::{command_for_key, EditorCommand};
pub use status::StatusMessage;
pub use terminal::{RawTerminal, TerminalInput};
