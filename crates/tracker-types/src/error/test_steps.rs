//! Test step table errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by test step operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum TestStepError {
    /// The record type has no test step custom field
    #[error("Work item {id} does not have a test step custom field")]
    NoTestStepField {
        /// Identifier of the work item
        id: String,
    },

    /// A step row does not have one value per configured column
    #[error("Incorrect number of values: test step requires {expected} columns ({}), got {actual}", columns.join(", "))]
    ColumnCountMismatch {
        /// Number of configured columns
        expected: usize,
        /// Number of supplied values
        actual: usize,
        /// Configured column identifiers
        columns: Vec<String>,
    },

    /// Step index outside the table
    #[error("Index {index} should be in range of test step length of {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current number of steps
        len: usize,
    },

    /// A cell does not carry html text content
    #[error("Step {step}, column {column}: cell must be non-lossy text/html")]
    InvalidCell {
        /// Zero based step index
        step: usize,
        /// Zero based column index
        column: usize,
    },

    /// Nothing to commit
    #[error("Test step table is empty")]
    Empty,
}
