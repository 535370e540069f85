//! Registry API client
//!
//! [`RegistryApi`] is the seam between the client runtime and the server:
//! six independent calls, no retry, no caching. Production uses
//! [`HttpApi`] (feature `http`); tests use the in-memory registry from the
//! harness crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod error;
#[cfg(feature = "http")]
mod http;

pub use api::RegistryApi;
pub use error::{ApiError, ErrorKind};
#[cfg(feature = "http")]
pub use http::{HttpApi, HttpApiBuilder};
