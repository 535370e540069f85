//! Wire format for the node registry API.
//!
//! The registry is an ordered list of nodes plus one global on/off flag,
//! exposed as JSON over HTTP. This crate holds only the shapes that cross
//! the wire; it has no opinion about transport or state.
//!
//! # Endpoints
//!
//! | method | path | body | response |
//! |--------|------|------|----------|
//! | `GET` | [`NODES_PATH`] | | `[Node]` |
//! | `POST` | [`NODES_PATH`] | [`NewNode`] | |
//! | `DELETE` | [`NODES_PATH`] | | |
//! | `PUT` | [`NODES_PATH`] | [`ReorderRequest`] | |
//! | `GET` | [`STATUS_PATH`] | | [`StatusBody`] |
//! | `POST` | [`STATUS_PATH`] | [`StatusBody`] | |
//!
//! The server identifies the caller out of band (by connection address), so
//! unregister carries no body and `Node::you` is computed per request.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod node;
pub mod status;

pub use errors::{ProtocolError, Result};
pub use node::{Created, DISPLAY_NAME_LEN, NewNode, Node, NodeList, ReorderRequest};
pub use status::StatusBody;

/// Path of the node collection.
pub const NODES_PATH: &str = "/api/nodes";

/// Path of the global status flag.
pub const STATUS_PATH: &str = "/api/status";
