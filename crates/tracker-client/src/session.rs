//! [`Session`] over HTTP.
//!
//! Maps every facility method onto one named remote operation. Transport
//! failures are converted at this boundary, so the object model only ever
//! sees [`TrackerError`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracker_core::{Session, TestManagementService, TrackerService};
use tracker_types::models::{
    EnumOptionId, FieldDelta, InitialAction, RawRecord, RawTestSteps, RichText, TestStep,
    TestStepColumn, WorkflowAction,
};
use tracker_types::{RecordError, RemoteError, Result, TrackerError};

use crate::client::{RetryMode, RpcClient};
use crate::config::ClientConfig;
use crate::error::ClientError;

const TRACKER: &str = "Tracker";
const TEST_MANAGEMENT: &str = "TestManagement";

/// Operations that add something on every call. Repeating one after a 5xx
/// can duplicate work the server already committed.
const NON_IDEMPOTENT: &[&str] = &[
    "createWorkItem",
    "createAttachment",
    "addComment",
    "addLinkedItem",
    "addHyperlink",
    "addApprovee",
    "addAssignee",
    "performWorkflowAction",
];

fn retry_mode(operation: &str) -> RetryMode {
    if NON_IDEMPOTENT.contains(&operation) {
        RetryMode::RateLimitOnly
    } else {
        RetryMode::Idempotent
    }
}

#[derive(Debug, Deserialize)]
struct TestRunRef {
    uri: String,
}

pub struct HttpSession {
    rpc: RpcClient,
}

impl HttpSession {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ClientError> {
        Ok(Self { rpc: RpcClient::new(config)? })
    }

    pub fn config(&self) -> &ClientConfig {
        self.rpc.config()
    }

    fn call<T: DeserializeOwned>(&self, service: &str, operation: &str, params: &Value) -> Result<Option<T>> {
        self.rpc
            .call(service, operation, params, retry_mode(operation))
            .map_err(|e| TrackerError::from(e.into_remote(service, operation)))
    }

    fn required<T: DeserializeOwned>(&self, service: &str, operation: &str, params: &Value) -> Result<T> {
        self.call(service, operation, params)?.ok_or_else(|| {
            RemoteError::InvalidResponse { operation: operation.to_string(), message: "missing result".to_string() }
                .into()
        })
    }

    fn list<T: DeserializeOwned>(&self, service: &str, operation: &str, params: &Value) -> Result<Vec<T>> {
        Ok(self.call(service, operation, params)?.unwrap_or_default())
    }

    fn unit(&self, operation: &str, params: &Value) -> Result<()> {
        self.call::<Value>(TRACKER, operation, params).map(drop)
    }
}

impl TrackerService for HttpSession {
    fn get_work_item_by_uri(&self, uri: &str) -> Result<RawRecord> {
        self.call(TRACKER, "getWorkItemByUri", &json!({ "uri": uri }))?
            .ok_or_else(|| RecordError::Unresolvable { reference: uri.to_string() }.into())
    }

    fn get_work_item_by_id(&self, project_id: &str, id: &str) -> Result<RawRecord> {
        self.call(TRACKER, "getWorkItemById", &json!({ "projectId": project_id, "workitemId": id }))?
            .ok_or_else(|| RecordError::NotFound { project: project_id.to_string(), id: id.to_string() }.into())
    }

    fn create_work_item(&self, record: &RawRecord) -> Result<String> {
        self.required(TRACKER, "createWorkItem", &json!({ "content": record }))
    }

    fn update_work_item(&self, uri: &str, changes: &FieldDelta) -> Result<()> {
        self.unit("updateWorkItem", &json!({ "uri": uri, "content": changes }))
    }

    fn delete_work_item(&self, uri: &str) -> Result<()> {
        self.unit("deleteWorkItems", &json!({ "uris": [uri] }))
    }

    fn get_initial_workflow_action(&self, project_id: &str, type_id: &str) -> Result<InitialAction> {
        let params = json!({ "projectId": project_id, "typeId": type_id });
        Ok(self.call(TRACKER, "getInitialWorkflowActionForProjectAndType", &params)?.unwrap_or_default())
    }

    fn get_custom_field_keys(&self, uri: &str) -> Result<Vec<String>> {
        self.list(TRACKER, "getCustomFieldKeys", &json!({ "uri": uri }))
    }

    fn get_available_enum_option_ids(&self, uri: &str, field: &str) -> Result<Vec<EnumOptionId>> {
        self.list(TRACKER, "getAvailableEnumOptionIdsForId", &json!({ "uri": uri, "fieldName": field }))
    }

    fn get_enum_options(&self, project_id: &str, enum_id: &str) -> Result<Vec<EnumOptionId>> {
        self.list(TRACKER, "getAllEnumOptionIdsForId", &json!({ "projectId": project_id, "enumId": enum_id }))
    }

    fn get_available_actions(&self, uri: &str) -> Result<Vec<WorkflowAction>> {
        self.list(TRACKER, "getAvailableActions", &json!({ "uri": uri }))
    }

    fn perform_workflow_action(&self, uri: &str, action_id: i32) -> Result<()> {
        self.unit("performWorkflowAction", &json!({ "uri": uri, "actionId": action_id }))
    }

    fn add_approvee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.unit("addApprovee", &json!({ "uri": uri, "userId": user_id }))
    }

    fn remove_approvee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.unit("removeApprovee", &json!({ "uri": uri, "userId": user_id }))
    }

    fn add_assignee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.unit("addAssignee", &json!({ "uri": uri, "userId": user_id }))
    }

    fn remove_assignee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.unit("removeAssignee", &json!({ "uri": uri, "userId": user_id }))
    }

    fn add_hyperlink(&self, uri: &str, url: &str, role: &str) -> Result<()> {
        self.unit("addHyperlink", &json!({ "uri": uri, "url": url, "role": { "id": role } }))
    }

    fn remove_hyperlink(&self, uri: &str, url: &str) -> Result<()> {
        self.unit("removeHyperlink", &json!({ "uri": uri, "url": url }))
    }

    fn add_linked_item(&self, uri: &str, target_uri: &str, role: &str) -> Result<()> {
        let params = json!({ "uri": uri, "targetUri": target_uri, "role": { "id": role } });
        self.unit("addLinkedItem", &params)
    }

    fn remove_linked_item(&self, uri: &str, target_uri: &str, role: Option<&str>) -> Result<()> {
        let role = role.map(|id| json!({ "id": id }));
        self.unit("removeLinkedItem", &json!({ "uri": uri, "targetUri": target_uri, "role": role }))
    }

    fn get_attachment(&self, uri: &str, attachment_id: &str) -> Result<Vec<u8>> {
        let operation = "getAttachment";
        let encoded: String = self.required(TRACKER, operation, &json!({ "uri": uri, "attachmentId": attachment_id }))?;
        STANDARD.decode(encoded).map_err(|e| {
            RemoteError::InvalidResponse { operation: operation.to_string(), message: e.to_string() }.into()
        })
    }

    fn create_attachment(&self, uri: &str, file_name: &str, title: &str, data: &[u8]) -> Result<()> {
        let params = json!({
            "uri": uri,
            "fileName": file_name,
            "title": title,
            "content": STANDARD.encode(data),
        });
        self.unit("createAttachment", &params)
    }

    fn update_attachment(
        &self,
        uri: &str,
        attachment_id: &str,
        file_name: &str,
        title: &str,
        data: &[u8],
    ) -> Result<()> {
        let params = json!({
            "uri": uri,
            "attachmentId": attachment_id,
            "fileName": file_name,
            "title": title,
            "content": STANDARD.encode(data),
        });
        self.unit("updateAttachment", &params)
    }

    fn delete_attachment(&self, uri: &str, attachment_id: &str) -> Result<()> {
        self.unit("deleteAttachment", &json!({ "uri": uri, "attachmentId": attachment_id }))
    }

    fn move_work_item_to_document(
        &self,
        uri: &str,
        document_uri: &str,
        parent_uri: Option<&str>,
        order: Option<u32>,
    ) -> Result<()> {
        // -1 places the item last
        let order = order.map_or(-1, i64::from);
        let params = json!({
            "workItemUri": uri,
            "documentUri": document_uri,
            "parentUri": parent_uri,
            "order": order,
        });
        self.unit("moveWorkItemToDocument", &params)
    }

    fn get_revisions(&self, uri: &str) -> Result<Vec<String>> {
        self.list(TRACKER, "getRevisions", &json!({ "uri": uri }))
    }

    fn add_comment(&self, parent_uri: &str, title: Option<&str>, content: &RichText) -> Result<()> {
        self.unit("addComment", &json!({ "parentUri": parent_uri, "title": title, "content": content }))
    }

    fn set_comment_tags(&self, comment_uri: &str, tags: &[String]) -> Result<()> {
        self.unit("setCommentTags", &json!({ "commentUri": comment_uri, "tags": tags }))
    }

    fn set_resolved_comment(&self, comment_uri: &str, resolved: bool) -> Result<()> {
        self.unit("setResolvedComment", &json!({ "commentUri": comment_uri, "resolved": resolved }))
    }

    fn is_resolved_comment(&self, comment_uri: &str) -> Result<bool> {
        Ok(self.call(TRACKER, "isResolvedComment", &json!({ "commentUri": comment_uri }))?.unwrap_or(false))
    }
}

impl TestManagementService for HttpSession {
    fn get_test_steps(&self, uri: &str) -> Result<Option<RawTestSteps>> {
        self.call(TEST_MANAGEMENT, "getTestSteps", &json!({ "uri": uri }))
    }

    fn set_test_steps(&self, uri: &str, steps: &[TestStep]) -> Result<()> {
        self.call::<Value>(TEST_MANAGEMENT, "setTestSteps", &json!({ "uri": uri, "testSteps": steps }))
            .map(drop)
    }

    fn get_test_steps_configuration(&self, project_id: &str) -> Result<Vec<TestStepColumn>> {
        self.list(TEST_MANAGEMENT, "getTestStepsConfiguration", &json!({ "projectId": project_id }))
    }

    fn search_test_run_uris(&self, query: &str, sort: &str, limit: Option<usize>) -> Result<Vec<String>> {
        let params = json!({ "query": query, "sort": sort, "fields": ["id"], "limit": limit });
        let runs: Vec<TestRunRef> = self.list(TEST_MANAGEMENT, "searchTestRunsWithFieldsLimited", &params)?;
        Ok(runs.into_iter().map(|run| run.uri).collect())
    }
}

impl Session for HttpSession {
    fn server_url(&self) -> &str {
        &self.rpc.config().base_url
    }
}
