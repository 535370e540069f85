//! Terminal UI for the node registry
//!
//! A thin shell over [`rollcall_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`rollcall_app::Runtime`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use commands::Command;
pub use input::{InputMode, InputState, KeyInput};
pub use rollcall_app::{App, AppEvent, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
