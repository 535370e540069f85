//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from a specific
//! frontend. Each frontend implements the trait to provide input and
//! rendering, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::SystemTime};

use crate::{App, AppEvent};

/// Abstracts frontend I/O for the application runtime.
///
/// Implementations provide platform-specific input and rendering while the
/// generic [`crate::Runtime`] handles orchestration. This ensures the same
/// orchestration code runs in the terminal UI and in tests.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for operator input and return the resulting events.
    ///
    /// Must be cancel-safe: the runtime polls it inside `select!` alongside
    /// the poll timer and completion channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn poll_event(&mut self) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send;

    /// Open a name prompt pre-filled with `default`.
    ///
    /// The answer comes back later through [`Self::poll_event`] as
    /// `Intent::SubmitName` or `Intent::CancelPrompt`.
    fn prompt_name(&mut self, default: &str);

    /// Wall-clock time, used to stamp completed refreshes.
    fn now(&self) -> SystemTime;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release frontend resources.
    fn stop(&mut self);
}
