//! Error types for the core state machines.

use thiserror::Error;

/// Errors from [`crate::RefreshScheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A ticket was handed back that does not match the cycle in flight.
    #[error("refresh ticket for cycle {ticket} does not match cycle in flight {current:?}")]
    StaleTicket {
        /// Cycle the ticket was issued for.
        ticket: u64,
        /// Cycle currently in flight, if any.
        current: Option<u64>,
    },
}

/// Errors from [`crate::Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The name prompt was declined or left empty. Not a failure; the join
    /// flow simply stops.
    #[error("registration cancelled")]
    UserCancelled,

    /// A name was submitted while no prompt was open.
    #[error("no name prompt is open")]
    NoPrompt,

    /// A reorder referred to a position outside the current list, or asked
    /// the first node to move up or the last to move down.
    #[error("cannot move position {index} in a list of {len}")]
    OutOfRange {
        /// Offending position (0-based).
        index: usize,
        /// Length of the list at dispatch time.
        len: usize,
    },
}
