//! Registry client core logic
//!
//! Pure state machines for keeping a local view of the node registry in
//! step with the server, completely decoupled from I/O.
//!
//! # Architecture
//!
//! Nothing in this crate performs a request or reads a clock. Methods take
//! the current time and fetch results as parameters and return declarative
//! actions describing the calls the runtime should make. The runtime feeds
//! the outcomes back in.
//!
//! Every mutation follows the same protocol: issue the command, wait for it
//! to finish, then refetch everything. The snapshot is only ever written
//! from a completed refresh, never speculatively.
//!
//! # Components
//!
//! - [`snapshot`]: the owned [`StateStore`] and its [`Snapshot`]
//! - [`scheduler`]: single-flight refresh cycles ([`RefreshScheduler`])
//! - [`dispatcher`]: operator intents to API commands ([`Dispatcher`])
//! - [`reorder`]: index planning for move up / move down
//! - [`projection`]: snapshot to view model
//! - [`error`]: error types

pub mod dispatcher;
pub mod error;
pub mod projection;
pub mod reorder;
pub mod scheduler;
pub mod snapshot;

pub use dispatcher::{ApiCommand, DispatchAction, Dispatcher, Intent};
pub use error::{DispatchError, SchedulerError};
pub use projection::{RowView, View, project};
pub use reorder::{Direction, Move};
pub use scheduler::{
    RefreshFetch, RefreshReport, RefreshScheduler, RefreshTicket, SchedulerState, Trigger,
};
pub use snapshot::{Snapshot, StateStore};
