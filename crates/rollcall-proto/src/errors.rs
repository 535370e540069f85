//! Decode errors for registry payloads.

use thiserror::Error;

/// Result alias for payload decoding.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while decoding a response body.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Body was not valid JSON or did not match the expected shape.
    #[error("malformed {what} payload: {source}")]
    Malformed {
        /// Which payload was being decoded.
        what: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    pub(crate) fn malformed(what: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { what, source }
    }
}
