//! Application layer for the registry client
//!
//! Pure application state machine plus a generic runtime, so the same
//! orchestration runs in the terminal UI and in deterministic tests.
//!
//! # Components
//!
//! - [`App`]: snapshot, refresh scheduling and command dispatch behind one
//!   `handle(event) -> actions` entry point
//! - [`Bridge`]: runs App actions against a [`rollcall_client::RegistryApi`]
//!   and reports completions back as events
//! - [`Driver`]: trait for platform-specific input and rendering
//! - [`Runtime`]: the event loop tying them together
//! - [`PreferenceStore`]: the persisted default registration name
//! - [`ClientConfig`]: server address, poll interval and timeouts

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod event;
mod prefs;
mod runtime;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use config::ClientConfig;
pub use driver::Driver;
pub use event::AppEvent;
pub use prefs::{FilePreferences, MemoryPreferences, PreferenceError, PreferenceStore, Preferences};
pub use runtime::Runtime;
