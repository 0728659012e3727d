//! # Tracker Core
//!
//! Client-side object model for work items held by a remote tracker.
//!
//! - **`mirror`** - Snapshot/shadow pair with minimal-diff flush
//! - **`deferred`** - Scoped guard that batches saves into one update
//! - **`links`** - Link edges and role-filtered traversal
//! - **`work_item`** - The [`WorkItem`] entity tying it all to a [`Session`]
//! - **`comments`**, **`test_table`** - Comment threads and test step tables
//! - **`service`** - Traits the RPC transport implements
//!
//! ## Example
//!
//! ```no_run
//! # fn demo(session: std::sync::Arc<dyn tracker_core::Session>) -> tracker_types::Result<()> {
//! use tracker_core::WorkItem;
//! use tracker_types::FieldValue;
//!
//! let mut item = WorkItem::from_id(session, "PROJ", "PROJ-12")?;
//! {
//!     let mut scope = item.with_deferred_save();
//!     scope.set_title("Renamed")?;
//!     scope.set_field("priority", FieldValue::enum_option("high"))?;
//!     scope.finish()?; // one update with both fields
//! }
//! for edge in item.linked_edges(["verifies", "~parent"]) {
//!     println!("{} -> {}", edge.role, edge.target);
//! }
//! # Ok(())
//! # }
//! ```

pub mod comments;
pub mod deferred;
pub mod links;
pub mod mirror;
pub mod service;
pub mod test_table;
pub mod work_item;

pub use comments::{Comment, CommentFormat};
pub use deferred::DeferredSave;
pub use links::{LinkEdge, LinkedEdges, RoleFilter, NEGATION_MARKER, UNSPECIFIED_ROLE};
pub use mirror::RecordMirror;
pub use service::{Session, TestManagementService, TrackerService};
pub use test_table::{TestStepRow, TestTable};
pub use work_item::{HyperlinkRole, ItemState, WorkItem};
