//! App actions
//!
//! Actions produced by the App state machine for the runtime to execute.

use rollcall_core::{ApiCommand, RefreshTicket};

/// Actions produced by the App state machine.
#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Redraw from the current state.
    Render,

    /// Quit the application.
    Quit,

    /// Fetch nodes and status for the cycle identified by the ticket. The
    /// ticket must come back in [`crate::AppEvent::RefreshCompleted`].
    Fetch(RefreshTicket),

    /// Run a remote command.
    Execute(ApiCommand),

    /// Ask the operator for a display name.
    PromptName {
        /// Pre-filled suggestion.
        default: String,
    },

    /// Persist the default registration name.
    SaveDefaultName(String),
}
