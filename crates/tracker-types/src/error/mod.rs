//! Typed error definitions for the tracker client.
//!
//! Errors are split by domain and wrapped by [`TrackerError`]. All of them are:
//!
//! - **Serializable** so a CLI or service can report them as JSON
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod record;
mod remote;
mod test_steps;

pub use record::RecordError;
pub use remote::RemoteError;
pub use test_steps::TestStepError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TrackerError {
    /// Wraps a record access or lifecycle error
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Wraps a failure reported by the RPC facility
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Wraps a test step table error
    #[error("Test step error: {0}")]
    TestSteps(#[from] TestStepError),
}

impl TrackerError {
    /// Check if retrying the same call may succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Remote(e) => e.is_transient(),
            Self::Record(_) | Self::TestSteps(_) => false,
        }
    }
}

/// Standard Result type using TrackerError.
pub type Result<T> = std::result::Result<T, TrackerError>;
