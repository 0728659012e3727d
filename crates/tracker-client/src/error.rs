//! Error types for the tracker HTTP client.

use thiserror::Error;
use tracker_types::RemoteError;

/// Errors that can occur when talking to the tracker over HTTP.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration is unusable (bad base URL, unreadable config file).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an invalid or unparseable response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server returned 429 Too Many Requests.
    #[error("Rate limited (429): retry after {retry_after:?}s")]
    RateLimited {
        /// Seconds to wait before retrying, if provided by server.
        retry_after: Option<u64>,
    },

    /// The operation ran and the server reported a fault.
    #[error("Fault: {message}")]
    Fault {
        /// Fault message from server.
        message: String,
    },

    /// Server returned an error status without a fault body.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Request kept failing after maximum retry attempts.
    #[error("Timeout after {0} attempts")]
    Timeout(u32),
}

impl ClientError {
    /// Whether the same call may succeed after a delay.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Convert into the error the object model understands, naming the
    /// remote operation that failed.
    pub fn into_remote(self, service: &str, operation: &str) -> RemoteError {
        match self {
            Self::Fault { message } => RemoteError::rpc(service, operation, message),
            Self::ServerError { status, message } => {
                RemoteError::rpc(service, operation, format!("HTTP {status}: {message}"))
            },
            Self::InvalidResponse(message) => {
                RemoteError::InvalidResponse { operation: operation.to_string(), message }
            },
            other @ (Self::Config(_) | Self::Request(_) | Self::RateLimited { .. } | Self::Timeout(_)) => {
                RemoteError::Transport { message: other.to_string() }
            },
        }
    }
}
