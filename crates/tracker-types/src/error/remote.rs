//! Errors reported by the RPC facility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of remote calls.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum RemoteError {
    /// A partial update was rejected (validation, conflict, permission)
    #[error("Update of {uri} rejected: {message}")]
    UpdateRejected {
        /// URI of the record being updated
        uri: String,
        /// Server-provided reason
        message: String,
    },

    /// A named remote operation failed
    #[error("{service}.{operation} failed: {message}")]
    Rpc {
        /// Service exposing the operation (e.g. "Tracker")
        service: String,
        /// Operation name
        operation: String,
        /// Server-provided reason
        message: String,
    },

    /// The transport could not deliver the call
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The server answered with a payload that does not decode
    #[error("Invalid response from {operation}: {message}")]
    InvalidResponse {
        /// Operation whose response was rejected
        operation: String,
        /// Decoder message
        message: String,
    },
}

impl RemoteError {
    /// Create an RPC failure for `service.operation`.
    pub fn rpc(service: &str, operation: &str, message: impl Into<String>) -> Self {
        Self::Rpc { service: service.to_string(), operation: operation.to_string(), message: message.into() }
    }

    /// Check if this is a temporary error that may resolve on retry.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
