//! Record type schemas: the fixed table of field names and their kinds.
//!
//! Every field a record type supports is declared here. Field access on a
//! mirrored record is validated against this table instead of accepting
//! arbitrary names.

use crate::error::RecordError;
use crate::models::{FieldKind, FieldValue};

/// Field names of the work item schema.
pub mod field {
    pub const ID: &str = "id";
    pub const URI: &str = "uri";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const TYPE: &str = "type";
    pub const STATUS: &str = "status";
    pub const RESOLUTION: &str = "resolution";
    pub const SEVERITY: &str = "severity";
    pub const PRIORITY: &str = "priority";
    pub const AUTHOR: &str = "author";
    pub const ASSIGNEE: &str = "assignee";
    pub const APPROVALS: &str = "approvals";
    pub const ATTACHMENTS: &str = "attachments";
    pub const COMMENTS: &str = "comments";
    pub const LINKED_WORK_ITEMS: &str = "linkedWorkItems";
    pub const LINKED_WORK_ITEMS_DERIVED: &str = "linkedWorkItemsDerived";
    pub const HYPERLINKS: &str = "hyperlinks";
    pub const LOCATION: &str = "location";
    pub const PROJECT: &str = "project";
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const DUE_DATE: &str = "dueDate";
    pub const PLANNED_START: &str = "plannedStart";
    pub const PLANNED_END: &str = "plannedEnd";
    pub const INITIAL_ESTIMATE: &str = "initialEstimate";
    pub const REMAINING_ESTIMATE: &str = "remainingEstimate";
    pub const TIME_SPENT: &str = "timeSpent";
    pub const CATEGORIES: &str = "categories";
    pub const OUTLINE_NUMBER: &str = "outlineNumber";
    pub const CUSTOM_FIELDS: &str = "customFields";
    pub const UNRESOLVABLE: &str = "unresolvable";
}

/// One typed slot of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn spec(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Declared fields of one record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    /// Human readable record type name, used in error messages
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    /// Look up a field or fail with [`RecordError::UnknownField`].
    pub fn require(&self, name: &str) -> Result<&'static FieldSpec, RecordError> {
        self.field(name).ok_or_else(|| RecordError::UnknownField {
            record: self.name.to_string(),
            field: name.to_string(),
        })
    }

    /// Validate that `value` may be stored in field `name`. `None` always fits.
    pub fn check(&self, name: &str, value: Option<&FieldValue>) -> Result<(), RecordError> {
        let spec = self.require(name)?;
        match value {
            Some(v) if v.kind() != spec.kind => Err(RecordError::FieldKindMismatch {
                field: name.to_string(),
                expected: spec.kind.to_string(),
                actual: v.kind().to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Schema of a work item.
pub const WORK_ITEM: RecordSchema = RecordSchema {
    name: "work item",
    fields: &[
        spec(field::ID, FieldKind::Text),
        spec(field::URI, FieldKind::Text),
        spec(field::TITLE, FieldKind::Text),
        spec(field::DESCRIPTION, FieldKind::Rich),
        spec(field::TYPE, FieldKind::Enum),
        spec(field::STATUS, FieldKind::Enum),
        spec(field::RESOLUTION, FieldKind::Enum),
        spec(field::SEVERITY, FieldKind::Enum),
        spec(field::PRIORITY, FieldKind::Enum),
        spec(field::AUTHOR, FieldKind::User),
        spec(field::ASSIGNEE, FieldKind::Users),
        spec(field::APPROVALS, FieldKind::Approvals),
        spec(field::ATTACHMENTS, FieldKind::Attachments),
        spec(field::COMMENTS, FieldKind::Comments),
        spec(field::LINKED_WORK_ITEMS, FieldKind::Links),
        spec(field::LINKED_WORK_ITEMS_DERIVED, FieldKind::Links),
        spec(field::HYPERLINKS, FieldKind::Hyperlinks),
        spec(field::LOCATION, FieldKind::Text),
        spec(field::PROJECT, FieldKind::Project),
        spec(field::CREATED, FieldKind::DateTime),
        spec(field::UPDATED, FieldKind::DateTime),
        spec(field::DUE_DATE, FieldKind::Date),
        spec(field::PLANNED_START, FieldKind::DateTime),
        spec(field::PLANNED_END, FieldKind::DateTime),
        spec(field::INITIAL_ESTIMATE, FieldKind::Duration),
        spec(field::REMAINING_ESTIMATE, FieldKind::Duration),
        spec(field::TIME_SPENT, FieldKind::Duration),
        spec(field::CATEGORIES, FieldKind::EnumList),
        spec(field::OUTLINE_NUMBER, FieldKind::Text),
        spec(field::CUSTOM_FIELDS, FieldKind::Custom),
        spec(field::UNRESOLVABLE, FieldKind::Boolean),
    ],
};
