//! Node registry payloads.
//!
//! A [`NodeList`] is ordered: a node's position is its priority in the
//! registry and is the only thing reorder requests refer to. Positions are
//! never stored on the node itself.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Maximum number of characters of a node name shown to the operator.
pub const DISPLAY_NAME_LEN: usize = 20;

/// Ordered registry contents as returned by `GET /api/nodes`.
pub type NodeList = Vec<Node>;

/// One registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Name chosen by the participant when registering.
    pub name: String,

    /// Hardware address, if the router has learned one.
    #[serde(default)]
    pub mac: Option<String>,

    /// Network address the node registered from.
    pub ip: String,

    /// Registration time.
    pub created: Created,

    /// Set by the server on the entry that belongs to the requesting client.
    #[serde(default)]
    pub you: bool,
}

impl Node {
    /// Name truncated for display. Identity always uses the full name.
    pub fn display_name(&self) -> &str {
        match self.name.char_indices().nth(DISPLAY_NAME_LEN) {
            Some((end, _)) => &self.name[..end],
            None => &self.name,
        }
    }

    /// Decode a `GET /api/nodes` response body.
    pub fn decode_list(bytes: &[u8]) -> Result<NodeList> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::malformed("node list", e))
    }
}

/// Registration timestamp in the server's `SystemTime` serde layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Created {
    /// Whole seconds since the Unix epoch.
    pub secs_since_epoch: u64,

    /// Sub-second part. Older servers omit it.
    #[serde(default)]
    pub nanos_since_epoch: u32,
}

impl Created {
    /// Timestamp at whole seconds since the epoch.
    pub fn from_secs(secs_since_epoch: u64) -> Self {
        Self { secs_since_epoch, nanos_since_epoch: 0 }
    }

    /// Convert to a [`SystemTime`]. `None` if the platform cannot represent
    /// it.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let since = Duration::from_secs(self.secs_since_epoch)
            .checked_add(Duration::from_nanos(u64::from(self.nanos_since_epoch)))?;
        UNIX_EPOCH.checked_add(since)
    }
}

impl From<SystemTime> for Created {
    fn from(time: SystemTime) -> Self {
        let since = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self { secs_since_epoch: since.as_secs(), nanos_since_epoch: since.subsec_nanos() }
    }
}

/// Body of `POST /api/nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNode {
    /// Display name for the caller.
    pub name: String,
}

/// Body of `PUT /api/nodes`.
///
/// Both indices refer to the list as the client last saw it. The server
/// resolves them against its current list, so they are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    /// Current position of the node to move.
    pub cur_i: usize,
    /// Position it should end up at.
    pub new_i: usize,
}
