//! Operator intents to API commands.
//!
//! The dispatcher decides which remote call an intent maps to, based on the
//! current snapshot. It never touches the snapshot itself: every command is
//! followed by a full refresh once the runtime reports it complete.
//!
//! # Join flow
//!
//! ```text
//! ToggleRegistration ──registered──> Execute(Unregister)
//!        │
//!        └─not registered─> PromptName { default }
//!                              │
//!             SubmitName(non-empty) ──> SaveDefaultName + Execute(Register)
//!             SubmitName("") / CancelPrompt ──> UserCancelled
//! ```

use std::fmt;

use crate::{
    error::DispatchError,
    reorder::{Direction, Move},
    snapshot::StateStore,
};

/// Something the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Leave if registered, otherwise start the join flow.
    ToggleRegistration,
    /// Answer to the name prompt.
    SubmitName(String),
    /// Name prompt dismissed.
    CancelPrompt,
    /// Flip the global status flag.
    ToggleStatus,
    /// Move the node at `index` one step.
    Step {
        /// Position of the node (0-based).
        index: usize,
        /// Which way.
        direction: Direction,
    },
    /// Move a node between two arbitrary positions (0-based).
    Reorder {
        /// Current position.
        cur: usize,
        /// Target position.
        new: usize,
    },
}

/// A remote mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// `POST /api/nodes`.
    Register {
        /// Display name.
        name: String,
    },
    /// `DELETE /api/nodes`.
    Unregister,
    /// `PUT /api/nodes`.
    Reorder {
        /// Current position.
        cur_i: usize,
        /// Target position.
        new_i: usize,
    },
    /// `POST /api/status`.
    SetStatus {
        /// New value.
        on: bool,
    },
}

impl fmt::Display for ApiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { name } => write!(f, "register as {name:?}"),
            Self::Unregister => f.write_str("unregister"),
            Self::Reorder { cur_i, new_i } => write!(f, "move {} to {}", cur_i + 1, new_i + 1),
            Self::SetStatus { on: true } => f.write_str("switch status on"),
            Self::SetStatus { on: false } => f.write_str("switch status off"),
        }
    }
}

/// Effects requested by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    /// Ask the operator for a display name.
    PromptName {
        /// Pre-filled suggestion.
        default: String,
    },
    /// Persist `name` as the suggestion for future prompts.
    SaveDefaultName(String),
    /// Run a remote command, then refresh.
    Execute(ApiCommand),
}

/// Intent dispatcher
///
/// Only tracks whether a name prompt is open.
#[derive(Debug, Default)]
pub struct Dispatcher {
    prompting: bool,
}

impl Dispatcher {
    /// Dispatcher with no prompt open.
    pub fn new() -> Self {
        Self::default()
    }

    /// A name prompt is open.
    pub fn is_prompting(&self) -> bool {
        self.prompting
    }

    /// Translate `intent` into actions.
    ///
    /// `default_name` is the remembered suggestion for the name prompt.
    ///
    /// # Errors
    ///
    /// - `UserCancelled` when the prompt is dismissed or answered empty
    /// - `NoPrompt` when a name arrives with no prompt open
    /// - `OutOfRange` for reorders outside the current list
    pub fn dispatch(
        &mut self,
        intent: Intent,
        store: &StateStore,
        default_name: Option<&str>,
    ) -> Result<Vec<DispatchAction>, DispatchError> {
        match intent {
            Intent::ToggleRegistration => Ok(self.toggle_registration(store, default_name)),
            Intent::SubmitName(name) => self.submit_name(&name),
            Intent::CancelPrompt => {
                self.prompting = false;
                Err(DispatchError::UserCancelled)
            },
            Intent::ToggleStatus => {
                let on = !store.read().status;
                Ok(vec![DispatchAction::Execute(ApiCommand::SetStatus { on })])
            },
            Intent::Step { index, direction } => {
                let len = store.read().nodes.len();
                let m = Move::step(len, index, direction)
                    .ok_or(DispatchError::OutOfRange { index, len })?;
                Ok(vec![reorder(m)])
            },
            Intent::Reorder { cur, new } => {
                let m = Move::between(store.read().nodes.len(), cur, new)?;
                Ok(vec![reorder(m)])
            },
        }
    }

    fn toggle_registration(
        &mut self,
        store: &StateStore,
        default_name: Option<&str>,
    ) -> Vec<DispatchAction> {
        if store.is_registered() {
            self.prompting = false;
            return vec![DispatchAction::Execute(ApiCommand::Unregister)];
        }

        self.prompting = true;
        vec![DispatchAction::PromptName { default: default_name.unwrap_or_default().to_string() }]
    }

    fn submit_name(&mut self, input: &str) -> Result<Vec<DispatchAction>, DispatchError> {
        if !self.prompting {
            return Err(DispatchError::NoPrompt);
        }
        self.prompting = false;

        let name = input.trim();
        if name.is_empty() {
            return Err(DispatchError::UserCancelled);
        }

        Ok(vec![
            DispatchAction::SaveDefaultName(name.to_string()),
            DispatchAction::Execute(ApiCommand::Register { name: name.to_string() }),
        ])
    }
}

fn reorder(m: Move) -> DispatchAction {
    DispatchAction::Execute(ApiCommand::Reorder { cur_i: m.cur, new_i: m.new })
}
