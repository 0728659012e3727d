//! The RPC facility the object model runs on.
//!
//! Each method maps one-to-one to a named remote operation. Implementations
//! block until the server answers; timeouts and retries are theirs to own.
//! Failures come back as [`tracker_types::TrackerError`] and are propagated
//! unchanged by the object model.

use tracker_types::models::{
    EnumOptionId, FieldDelta, InitialAction, RawRecord, RawTestSteps, RichText,
    TestStep, TestStepColumn, WorkflowAction,
};
use tracker_types::Result;

/// Record-level operations of the tracker service.
pub trait TrackerService: Send + Sync {
    /// Fetch a record by URI. Fails with `RecordError::Unresolvable`.
    fn get_work_item_by_uri(&self, uri: &str) -> Result<RawRecord>;

    /// Fetch a record by project and id. Fails with `RecordError::NotFound`.
    fn get_work_item_by_id(&self, project_id: &str, id: &str) -> Result<RawRecord>;

    /// Create a record and return its URI.
    fn create_work_item(&self, record: &RawRecord) -> Result<String>;

    /// Apply a partial update containing only changed fields.
    fn update_work_item(&self, uri: &str, changes: &FieldDelta) -> Result<()>;

    fn delete_work_item(&self, uri: &str) -> Result<()>;

    /// Initial workflow action for a new record of `type_id`.
    fn get_initial_workflow_action(&self, project_id: &str, type_id: &str) -> Result<InitialAction>;

    fn get_custom_field_keys(&self, uri: &str) -> Result<Vec<String>>;

    /// Enum options currently selectable for `field` on the record.
    fn get_available_enum_option_ids(&self, uri: &str, field: &str) -> Result<Vec<EnumOptionId>>;

    /// All options of a project enumeration (e.g. `requirement-status`).
    fn get_enum_options(&self, project_id: &str, enum_id: &str) -> Result<Vec<EnumOptionId>>;

    fn get_available_actions(&self, uri: &str) -> Result<Vec<WorkflowAction>>;

    fn perform_workflow_action(&self, uri: &str, action_id: i32) -> Result<()>;

    fn add_approvee(&self, uri: &str, user_id: &str) -> Result<()>;

    fn remove_approvee(&self, uri: &str, user_id: &str) -> Result<()>;

    fn add_assignee(&self, uri: &str, user_id: &str) -> Result<()>;

    fn remove_assignee(&self, uri: &str, user_id: &str) -> Result<()>;

    fn add_hyperlink(&self, uri: &str, url: &str, role: &str) -> Result<()>;

    fn remove_hyperlink(&self, uri: &str, url: &str) -> Result<()>;

    fn add_linked_item(&self, uri: &str, target_uri: &str, role: &str) -> Result<()>;

    /// Remove a link. `role` is `None` for links stored without a role.
    fn remove_linked_item(&self, uri: &str, target_uri: &str, role: Option<&str>) -> Result<()>;

    fn get_attachment(&self, uri: &str, attachment_id: &str) -> Result<Vec<u8>>;

    fn create_attachment(&self, uri: &str, file_name: &str, title: &str, data: &[u8]) -> Result<()>;

    fn update_attachment(
        &self,
        uri: &str,
        attachment_id: &str,
        file_name: &str,
        title: &str,
        data: &[u8],
    ) -> Result<()>;

    fn delete_attachment(&self, uri: &str, attachment_id: &str) -> Result<()>;

    /// Move the record into a document under `parent_uri` (top level if `None`).
    /// `order` of `None` places it last.
    fn move_work_item_to_document(
        &self,
        uri: &str,
        document_uri: &str,
        parent_uri: Option<&str>,
        order: Option<u32>,
    ) -> Result<()>;

    /// Revision identifiers, oldest first.
    fn get_revisions(&self, uri: &str) -> Result<Vec<String>>;

    /// Add a comment under `parent_uri` (a record or a comment URI).
    fn add_comment(&self, parent_uri: &str, title: Option<&str>, content: &RichText) -> Result<()>;

    fn set_comment_tags(&self, comment_uri: &str, tags: &[String]) -> Result<()>;

    fn set_resolved_comment(&self, comment_uri: &str, resolved: bool) -> Result<()>;

    fn is_resolved_comment(&self, comment_uri: &str) -> Result<bool>;
}

/// Test management operations.
pub trait TestManagementService: Send + Sync {
    /// Stored test steps, `None` when the record has none.
    fn get_test_steps(&self, uri: &str) -> Result<Option<RawTestSteps>>;

    fn set_test_steps(&self, uri: &str, steps: &[TestStep]) -> Result<()>;

    /// Columns configured for test steps in a project.
    fn get_test_steps_configuration(&self, project_id: &str) -> Result<Vec<TestStepColumn>>;

    /// URIs of test runs matching `query`, sorted by `sort`.
    fn search_test_run_uris(&self, query: &str, sort: &str, limit: Option<usize>) -> Result<Vec<String>>;
}

/// A connected session: every service plus the server's browser URL.
pub trait Session: TrackerService + TestManagementService {
    fn server_url(&self) -> &str;
}

