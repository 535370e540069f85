//! Deterministic test harness for the registry client.
//!
//! In-memory implementations of the [`rollcall_client::RegistryApi`] and
//! [`rollcall_app::Driver`] traits, so the production runtime can be driven
//! under tokio's paused clock with injected latency and failures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod registry;
pub mod scripted_driver;

pub use registry::{MemoryRegistry, RecordedCall, RegistryClient};
pub use scripted_driver::{DriverLog, RenderedFrame, ScriptedDriver};
