//! Domain models for records exchanged with the tracker server.
//!
//! All models derive serde traits with the server's camelCase field names.

mod attachment;
mod comment;
mod link;
mod record;
mod test_steps;
mod value;
mod workflow;

pub use attachment::{Approval, AttachmentInfo};
pub use comment::CommentRecord;
pub use link::{Hyperlink, RawLink};
pub use record::{FieldDelta, RawRecord};
pub use test_steps::{RawTestSteps, TestStep, TestStepColumn};
pub use value::{EnumOptionId, FieldKind, FieldValue, ProjectRef, RichText, UserRef};
pub use workflow::{InitialAction, WorkflowAction};
