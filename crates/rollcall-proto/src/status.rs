//! Global status flag payload.

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Body of `GET /api/status` and `POST /api/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    /// Whether forwarding is switched on for every node.
    pub on: bool,
}

impl StatusBody {
    /// Decode a status response body.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::malformed("status", e))
    }
}
