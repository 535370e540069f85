//! Client snapshot and its owning store.
//!
//! The store is the single source of truth for rendering. It is owned by
//! the application state machine and handed out by reference; there is no
//! global instance.

use std::time::SystemTime;

use rollcall_proto::{Node, NodeList};

/// The client's full view of server state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// A refresh cycle is in flight.
    pub loading: bool,
    /// Global status flag from the last successful refresh.
    pub status: bool,
    /// Registry contents from the last successful refresh, in server order.
    pub nodes: NodeList,
    /// When the last successful refresh completed.
    pub refreshed_at: Option<SystemTime>,
    /// Why the most recent refresh failed. Cleared by the next success.
    pub last_error: Option<String>,
}

/// Owner of the [`Snapshot`].
///
/// Setters are synchronous and immediately visible through [`Self::read`].
#[derive(Debug, Default)]
pub struct StateStore {
    snapshot: Snapshot,
}

impl StateStore {
    /// Empty store: not loading, status off, no nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn read(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Mark a refresh as started or finished.
    pub fn set_loading(&mut self, loading: bool) {
        self.snapshot.loading = loading;
    }

    /// Replace the node list with a server response.
    pub fn set_nodes(&mut self, nodes: NodeList) {
        let own = nodes.iter().filter(|n| n.you).count();
        if own > 1 {
            tracing::warn!(own, "server marked more than one node as ours");
        }
        self.snapshot.nodes = nodes;
    }

    /// Replace the global status flag.
    pub fn set_status(&mut self, status: bool) {
        self.snapshot.status = status;
    }

    pub(crate) fn mark_refreshed(&mut self, at: SystemTime) {
        self.snapshot.refreshed_at = Some(at);
        self.snapshot.last_error = None;
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.snapshot.last_error = Some(error);
    }

    /// This client has a node in the registry.
    pub fn is_registered(&self) -> bool {
        self.self_index().is_some()
    }

    /// Position of this client's node, if registered.
    pub fn self_index(&self) -> Option<usize> {
        self.snapshot.nodes.iter().position(|n| n.you)
    }

    /// This client's node, if registered.
    pub fn own_node(&self) -> Option<&Node> {
        self.snapshot.nodes.iter().find(|n| n.you)
    }
}
