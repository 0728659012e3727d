//! Record access and lifecycle errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading, creating or projecting a record.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum RecordError {
    /// The server could not resolve the referenced record
    #[error("Record {reference} could not be resolved")]
    Unresolvable {
        /// URI or identifier that failed to resolve
        reference: String,
    },

    /// No record with the given identifier exists in the project
    #[error("Record {id} not found in project {project}")]
    NotFound {
        /// Project that was searched
        project: String,
        /// Record identifier that was requested
        id: String,
    },

    /// Field name is not part of the record type's schema
    #[error("Unknown field '{field}' for {record}")]
    UnknownField {
        /// Schema name of the record type
        record: String,
        /// Name of the rejected field
        field: String,
    },

    /// Field exists but the value has the wrong kind
    #[error("Field '{field}' expects {expected}, got {actual}")]
    FieldKindMismatch {
        /// Name of the field
        field: String,
        /// Kind declared by the schema
        expected: String,
        /// Kind of the rejected value
        actual: String,
    },

    /// Initial fields of a new record name a field the schema does not know
    #[error("{field} in the new record fields is not recognised as a record field")]
    UnknownNewField {
        /// Name of the rejected field
        field: String,
    },

    /// Creating a record requires fields the caller did not supply
    #[error("New record requires fields {} to be filled in", fields.join(", "))]
    MissingRequiredFields {
        /// Required field names reported by the server
        fields: Vec<String>,
    },

    /// The record was deleted upstream and can no longer be used
    #[error("Record {uri} was deleted")]
    Stale {
        /// URI of the deleted record
        uri: String,
    },

    /// Raw record payload lacks a field needed to identify it
    #[error("Record is missing identifying field '{field}'")]
    MissingIdentity {
        /// Name of the absent field
        field: String,
    },

    /// A local file used as upload source or download target failed
    #[error("File error for {path}: {message}")]
    Io {
        /// Filesystem path involved
        path: String,
        /// Description of the failure
        message: String,
    },
}

impl RecordError {
    /// Create an IO error for the given path.
    pub fn from_io_error(path: &std::path::Path, e: &std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), message: e.to_string() }
    }
}
