//! Registry API abstraction.

use async_trait::async_trait;
use rollcall_proto::NodeList;

use crate::ApiError;

/// Remote operations on the node registry.
///
/// Every call is independent and runs to completion or failure. Callers
/// never read state out of mutation responses; they refetch instead.
#[async_trait]
pub trait RegistryApi: Send + Sync + 'static {
    /// Fetch the ordered node list.
    ///
    /// The server sets `you` on the entry belonging to the caller.
    async fn list_nodes(&self) -> Result<NodeList, ApiError>;

    /// Register the caller under `name`, or rename it if already present.
    async fn register_node(&self, name: &str) -> Result<(), ApiError>;

    /// Remove the caller. The server identifies it by connection.
    async fn unregister_node(&self) -> Result<(), ApiError>;

    /// Move the node at `cur_i` to `new_i`.
    ///
    /// Indices refer to the list the client last saw; the server resolves
    /// them against its own list.
    async fn reorder_node(&self, cur_i: usize, new_i: usize) -> Result<(), ApiError>;

    /// Fetch the global status flag.
    async fn get_status(&self) -> Result<bool, ApiError>;

    /// Set the global status flag.
    async fn set_status(&self, on: bool) -> Result<(), ApiError>;
}
