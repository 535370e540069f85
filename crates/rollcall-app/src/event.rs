//! App events
//!
//! Inputs to the App state machine: timer ticks, operator intents and
//! completions of work the runtime started on the App's behalf.

use rollcall_client::ApiError;
use rollcall_core::{ApiCommand, Intent, RefreshFetch, RefreshTicket};

/// Events consumed by [`crate::App::handle`].
#[derive(Debug)]
pub enum AppEvent {
    /// Poll interval elapsed.
    Tick,

    /// Operator asked for an immediate refresh.
    RefreshRequested,

    /// Operator intent from the UI.
    Intent(Intent),

    /// A refresh cycle finished, successfully or not.
    RefreshCompleted {
        /// Ticket handed out with [`crate::AppAction::Fetch`].
        ticket: RefreshTicket,
        /// Both fetch results, or the first failure.
        result: Result<RefreshFetch, ApiError>,
    },

    /// A remote command finished, successfully or not.
    CommandCompleted {
        /// The command that ran.
        command: ApiCommand,
        /// Its outcome.
        result: Result<(), ApiError>,
    },

    /// Operator asked to quit.
    Quit,
}
