//! # Tracker Types
//!
//! Record model, field schema and error definitions for the work-item
//! tracker client.
//!
//! - **`error`** - Typed error hierarchy for records, remote calls and test steps
//! - **`models`** - Raw records, field values and the structures nested in them
//! - **`schema`** - Fixed per-type field tables used to validate field access
//!
//! ## Architecture Role
//!
//! `tracker-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                tracker-types (this crate)
//!                        │
//!              ┌─────────┴─────────┐
//!              ▼                   ▼
//!        tracker-core  ◄──  tracker-client
//!              │                   │
//!              └─────────┬─────────┘
//!                        ▼
//!                   tracker-cli
//! ```

pub mod error;
pub mod models;
pub mod schema;

pub use error::{RecordError, RemoteError, Result, TestStepError, TrackerError};

pub use models::{
    AttachmentInfo, EnumOptionId, FieldDelta, FieldKind, FieldValue, RawLink, RawRecord, RichText,
    UserRef,
};
pub use schema::{field, RecordSchema, WORK_ITEM};
