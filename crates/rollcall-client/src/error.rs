//! Error types for registry calls.

use std::time::Duration;

use rollcall_proto::ProtocolError;
use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be sent or did not complete successfully.
    Network,
    /// The response body was not what the endpoint promises.
    Decode,
}

/// Errors from [`crate::RegistryApi`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failed or was reset.
    #[error("{path}: {message}")]
    Network {
        /// Endpoint path.
        path: &'static str,
        /// Transport error description.
        message: String,
    },

    /// Server answered with a non-2xx status.
    #[error("{path}: HTTP {status}")]
    Status {
        /// Endpoint path.
        path: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// No answer within the request timeout.
    #[error("{path}: timed out after {after:?}")]
    Timeout {
        /// Endpoint path.
        path: &'static str,
        /// Configured timeout.
        after: Duration,
    },

    /// Response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] ProtocolError),

    /// The task running the call went away before reporting back.
    #[error("request abandoned before completion")]
    Interrupted,
}

impl ApiError {
    /// Network or decode failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::Network { .. } | Self::Status { .. } | Self::Timeout { .. } | Self::Interrupted => {
                ErrorKind::Network
            },
        }
    }
}
