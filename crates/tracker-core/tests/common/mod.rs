//! In-memory tracker used by the integration tests.
//!
//! Keeps records keyed by URI, applies updates the way the server would and
//! records every call so tests can assert on remote traffic.

#![allow(dead_code, reason = "each test binary uses a different subset")]
#![allow(clippy::unwrap_used, reason = "poisoned test mutexes should panic")]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracker_core::{Session, TestManagementService, TrackerService, WorkItem};
use tracker_types::models::{
    AttachmentInfo, CommentRecord, EnumOptionId, FieldDelta, FieldValue, Hyperlink, InitialAction,
    ProjectRef, RawLink, RawRecord, RawTestSteps, RichText, TestStep, TestStepColumn, UserRef,
    WorkflowAction,
};
use tracker_types::schema::field;
use tracker_types::{RecordError, RemoteError, Result, TrackerError};

pub const PROJECT: &str = "DEMO";

pub fn uri_of(id: &str) -> String {
    format!("subterra:data-service:objects:/default/{PROJECT}${{WorkItem}}{id}")
}

/// A minimal resolvable record.
pub fn record(id: &str, title: &str) -> RawRecord {
    RawRecord::new()
        .with(field::ID, id)
        .with(field::URI, uri_of(id))
        .with(field::TITLE, title)
        .with(field::TYPE, EnumOptionId::new("requirement"))
        .with(field::STATUS, FieldValue::enum_option("open"))
        .with(field::PROJECT, FieldValue::Project(ProjectRef::new(PROJECT)))
}

/// One remote call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub args: Vec<String>,
}

#[derive(Default)]
struct State {
    records: BTreeMap<String, RawRecord>,
    calls: Vec<Call>,
    updates: Vec<(String, FieldDelta)>,
    fail_updates: Option<TrackerError>,
    fail_fetches: Option<TrackerError>,
    required_fields: Vec<String>,
    custom_keys: Vec<String>,
    enums: BTreeMap<String, Vec<String>>,
    available_status: Vec<String>,
    actions: Vec<(WorkflowAction, String)>,
    attachments: BTreeMap<(String, String), Vec<u8>>,
    test_steps: BTreeMap<String, RawTestSteps>,
    test_step_columns: Vec<TestStepColumn>,
    test_runs: Vec<String>,
    revisions: Vec<String>,
    resolved_comments: BTreeMap<String, bool>,
    comment_tags: BTreeMap<String, Vec<String>>,
    next_id: u32,
}

pub struct FakeTracker {
    state: Mutex<State>,
}

impl FakeTracker {
    pub fn new() -> Arc<Self> {
        let state = State {
            test_step_columns: vec![
                TestStepColumn { id: "step".to_string(), name: "Step".to_string() },
                TestStepColumn { id: "expectedResult".to_string(), name: "Expected Result".to_string() },
            ],
            next_id: 100,
            ..State::default()
        };
        Arc::new(Self { state: Mutex::new(state) })
    }

    pub fn session(self: &Arc<Self>) -> Arc<dyn Session> {
        Arc::clone(self) as Arc<dyn Session>
    }

    pub fn insert(&self, raw: RawRecord) {
        let uri = raw.uri().unwrap().to_string();
        self.state.lock().unwrap().records.insert(uri, raw);
    }

    /// Insert a record and load it as a work item.
    pub fn load(self: &Arc<Self>, raw: RawRecord) -> WorkItem {
        let uri = raw.uri().unwrap().to_string();
        self.insert(raw);
        let item = WorkItem::from_uri(self.session(), &uri).unwrap();
        self.clear_calls();
        item
    }

    pub fn stored(&self, uri: &str) -> Option<RawRecord> {
        self.state.lock().unwrap().records.get(uri).cloned()
    }

    /// Change a stored record behind the client's back.
    pub fn edit(&self, uri: &str, name: &str, value: Option<FieldValue>) {
        let mut state = self.state.lock().unwrap();
        if let Some(raw) = state.records.get_mut(uri) {
            raw.set(name, value);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.op == op).count()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.clear();
        state.updates.clear();
    }

    pub fn updates(&self) -> Vec<(String, FieldDelta)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn fail_updates_with(&self, err: Option<TrackerError>) {
        self.state.lock().unwrap().fail_updates = err;
    }

    pub fn fail_fetches_with(&self, err: Option<TrackerError>) {
        self.state.lock().unwrap().fail_fetches = err;
    }

    pub fn require_fields(&self, fields: &[&str]) {
        self.state.lock().unwrap().required_fields = fields.iter().map(ToString::to_string).collect();
    }

    pub fn set_custom_keys(&self, keys: &[&str]) {
        self.state.lock().unwrap().custom_keys = keys.iter().map(ToString::to_string).collect();
    }

    pub fn set_enum(&self, enum_id: &str, options: &[&str]) {
        let options = options.iter().map(ToString::to_string).collect();
        self.state.lock().unwrap().enums.insert(enum_id.to_string(), options);
    }

    pub fn set_available_status(&self, status: &[&str]) {
        self.state.lock().unwrap().available_status = status.iter().map(ToString::to_string).collect();
    }

    /// Register a workflow action that moves the item to `target_status`.
    pub fn add_action(&self, action_id: i32, native: &str, name: &str, target_status: &str) {
        let action = WorkflowAction {
            action_id,
            action_name: name.to_string(),
            native_action_id: native.to_string(),
            required_features: Vec::new(),
        };
        self.state.lock().unwrap().actions.push((action, target_status.to_string()));
    }

    pub fn set_test_steps_for(&self, uri: &str, steps: RawTestSteps) {
        self.state.lock().unwrap().test_steps.insert(uri.to_string(), steps);
    }

    pub fn stored_test_steps(&self, uri: &str) -> Option<RawTestSteps> {
        self.state.lock().unwrap().test_steps.get(uri).cloned()
    }

    pub fn set_test_runs(&self, runs: &[&str]) {
        self.state.lock().unwrap().test_runs = runs.iter().map(ToString::to_string).collect();
    }

    pub fn set_revisions(&self, revisions: &[&str]) {
        self.state.lock().unwrap().revisions = revisions.iter().map(ToString::to_string).collect();
    }

    pub fn comment_tags(&self, comment_uri: &str) -> Option<Vec<String>> {
        self.state.lock().unwrap().comment_tags.get(comment_uri).cloned()
    }

    fn log(&self, op: &'static str, args: &[&str]) {
        let args = args.iter().map(ToString::to_string).collect();
        self.state.lock().unwrap().calls.push(Call { op, args });
    }

    fn with_record<T>(&self, uri: &str, f: impl FnOnce(&mut RawRecord) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        let raw = state
            .records
            .get_mut(uri)
            .ok_or_else(|| RemoteError::rpc("Tracker", "lookup", format!("no record {uri}")))?;
        Ok(f(raw))
    }
}

fn links_mut<'a>(raw: &'a mut RawRecord, name: &str) -> &'a mut Vec<RawLink> {
    if !matches!(raw.get(name), Some(FieldValue::Links(_))) {
        raw.set(name, Some(FieldValue::Links(Vec::new())));
    }
    match raw.get_mut(name) {
        Some(FieldValue::Links(links)) => links,
        _ => unreachable!("links field was just initialised"),
    }
}

fn role_matches(link: &RawLink, role: Option<&str>) -> bool {
    link.role.as_ref().map(|r| r.id.as_str()) == role
}

impl TrackerService for FakeTracker {
    fn get_work_item_by_uri(&self, uri: &str) -> Result<RawRecord> {
        self.log("getWorkItemByUri", &[uri]);
        if let Some(err) = self.state.lock().unwrap().fail_fetches.clone() {
            return Err(err);
        }
        self.stored(uri).ok_or_else(|| RecordError::Unresolvable { reference: uri.to_string() }.into())
    }

    fn get_work_item_by_id(&self, project_id: &str, id: &str) -> Result<RawRecord> {
        self.log("getWorkItemById", &[project_id, id]);
        self.stored(&uri_of(id))
            .ok_or_else(|| RecordError::NotFound { project: project_id.to_string(), id: id.to_string() }.into())
    }

    fn create_work_item(&self, record: &RawRecord) -> Result<String> {
        self.log("createWorkItem", &[]);
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("{PROJECT}-{}", state.next_id);
        let mut raw = record.clone();
        raw.set(field::ID, Some(FieldValue::from(id.as_str())));
        raw.set(field::URI, Some(FieldValue::from(uri_of(&id))));
        state.records.insert(uri_of(&id), raw);
        Ok(uri_of(&id))
    }

    fn update_work_item(&self, uri: &str, changes: &FieldDelta) -> Result<()> {
        let mut args = vec![uri];
        args.extend(changes.field_names());
        self.log("updateWorkItem", &args);
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fail_updates.clone() {
            return Err(err);
        }
        state.updates.push((uri.to_string(), changes.clone()));
        if let Some(raw) = state.records.get_mut(uri) {
            for (name, value) in changes.iter() {
                raw.set(name, value.cloned());
            }
        }
        Ok(())
    }

    fn delete_work_item(&self, uri: &str) -> Result<()> {
        self.log("deleteWorkItem", &[uri]);
        self.state.lock().unwrap().records.remove(uri);
        Ok(())
    }

    fn get_initial_workflow_action(&self, project_id: &str, type_id: &str) -> Result<InitialAction> {
        self.log("getInitialWorkflowActionForProjectAndType", &[project_id, type_id]);
        Ok(InitialAction { required_features: self.state.lock().unwrap().required_fields.clone() })
    }

    fn get_custom_field_keys(&self, uri: &str) -> Result<Vec<String>> {
        self.log("getCustomFieldKeys", &[uri]);
        Ok(self.state.lock().unwrap().custom_keys.clone())
    }

    fn get_available_enum_option_ids(&self, uri: &str, field: &str) -> Result<Vec<EnumOptionId>> {
        self.log("getAvailableEnumOptionIdsForId", &[uri, field]);
        Ok(self.state.lock().unwrap().available_status.iter().map(EnumOptionId::new).collect())
    }

    fn get_enum_options(&self, project_id: &str, enum_id: &str) -> Result<Vec<EnumOptionId>> {
        self.log("getEnumOptionsForId", &[project_id, enum_id]);
        let state = self.state.lock().unwrap();
        let options = state
            .enums
            .get(enum_id)
            .ok_or_else(|| RemoteError::rpc("Tracker", "getEnumOptionsForId", format!("no enum {enum_id}")))?;
        Ok(options.iter().map(EnumOptionId::new).collect())
    }

    fn get_available_actions(&self, uri: &str) -> Result<Vec<WorkflowAction>> {
        self.log("getAvailableActions", &[uri]);
        Ok(self.state.lock().unwrap().actions.iter().map(|(a, _)| a.clone()).collect())
    }

    fn perform_workflow_action(&self, uri: &str, action_id: i32) -> Result<()> {
        self.log("performWorkflowAction", &[uri, &action_id.to_string()]);
        let target = self
            .state
            .lock()
            .unwrap()
            .actions
            .iter()
            .find(|(a, _)| a.action_id == action_id)
            .map(|(_, target)| target.clone())
            .ok_or_else(|| RemoteError::rpc("Tracker", "performWorkflowAction", "unknown action"))?;
        self.with_record(uri, |raw| raw.set(field::STATUS, Some(FieldValue::enum_option(target))))?;
        Ok(())
    }

    fn add_approvee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.log("addApprovee", &[uri, user_id]);
        self.with_record(uri, |raw| {
            let mut list = match raw.get(field::APPROVALS) {
                Some(FieldValue::Approvals(list)) => list.clone(),
                _ => Vec::new(),
            };
            list.push(tracker_types::models::Approval { user: UserRef::new(user_id), status: None });
            raw.set(field::APPROVALS, Some(FieldValue::Approvals(list)));
        })
    }

    fn remove_approvee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.log("removeApprovee", &[uri, user_id]);
        self.with_record(uri, |raw| {
            if let Some(FieldValue::Approvals(list)) = raw.get_mut(field::APPROVALS) {
                list.retain(|a| a.user.id != user_id);
            }
        })
    }

    fn add_assignee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.log("addAssignee", &[uri, user_id]);
        self.with_record(uri, |raw| {
            let mut users = match raw.get(field::ASSIGNEE) {
                Some(FieldValue::Users(users)) => users.clone(),
                _ => Vec::new(),
            };
            users.push(UserRef::new(user_id));
            raw.set(field::ASSIGNEE, Some(FieldValue::Users(users)));
        })
    }

    fn remove_assignee(&self, uri: &str, user_id: &str) -> Result<()> {
        self.log("removeAssignee", &[uri, user_id]);
        self.with_record(uri, |raw| {
            if let Some(FieldValue::Users(users)) = raw.get_mut(field::ASSIGNEE) {
                users.retain(|u| u.id != user_id);
            }
        })
    }

    fn add_hyperlink(&self, uri: &str, url: &str, role: &str) -> Result<()> {
        self.log("addHyperlink", &[uri, url, role]);
        self.with_record(uri, |raw| {
            let mut links = match raw.get(field::HYPERLINKS) {
                Some(FieldValue::Hyperlinks(links)) => links.clone(),
                _ => Vec::new(),
            };
            links.push(Hyperlink { role: Some(EnumOptionId::new(role)), uri: url.to_string() });
            raw.set(field::HYPERLINKS, Some(FieldValue::Hyperlinks(links)));
        })
    }

    fn remove_hyperlink(&self, uri: &str, url: &str) -> Result<()> {
        self.log("removeHyperlink", &[uri, url]);
        self.with_record(uri, |raw| {
            if let Some(FieldValue::Hyperlinks(links)) = raw.get_mut(field::HYPERLINKS) {
                links.retain(|l| l.uri != url);
            }
        })
    }

    fn add_linked_item(&self, uri: &str, target_uri: &str, role: &str) -> Result<()> {
        self.log("addLinkedItem", &[uri, target_uri, role]);
        self.with_record(uri, |raw| links_mut(raw, field::LINKED_WORK_ITEMS).push(RawLink::new(role, target_uri)))?;
        self.with_record(target_uri, |raw| {
            links_mut(raw, field::LINKED_WORK_ITEMS_DERIVED).push(RawLink::new(role, uri));
        })
    }

    fn remove_linked_item(&self, uri: &str, target_uri: &str, role: Option<&str>) -> Result<()> {
        self.log("removeLinkedItem", &[uri, target_uri, role.unwrap_or("-")]);
        self.with_record(uri, |raw| {
            links_mut(raw, field::LINKED_WORK_ITEMS)
                .retain(|l| !(l.work_item_uri == target_uri && role_matches(l, role)));
        })?;
        self.with_record(target_uri, |raw| {
            links_mut(raw, field::LINKED_WORK_ITEMS_DERIVED)
                .retain(|l| !(l.work_item_uri == uri && role_matches(l, role)));
        })
    }

    fn get_attachment(&self, uri: &str, attachment_id: &str) -> Result<Vec<u8>> {
        self.log("getAttachment", &[uri, attachment_id]);
        self.state
            .lock()
            .unwrap()
            .attachments
            .get(&(uri.to_string(), attachment_id.to_string()))
            .cloned()
            .ok_or_else(|| RemoteError::rpc("Tracker", "getAttachment", "no such attachment").into())
    }

    fn create_attachment(&self, uri: &str, file_name: &str, title: &str, data: &[u8]) -> Result<()> {
        self.log("createAttachment", &[uri, file_name, title]);
        let id = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = state.next_id.to_string();
            state.attachments.insert((uri.to_string(), id.clone()), data.to_vec());
            id
        };
        self.with_record(uri, |raw| {
            let mut list = match raw.get(field::ATTACHMENTS) {
                Some(FieldValue::Attachments(list)) => list.clone(),
                _ => Vec::new(),
            };
            list.push(AttachmentInfo {
                id,
                file_name: file_name.to_string(),
                title: Some(title.to_string()),
                length: Some(data.len() as u64),
                uri: None,
                updated: None,
                author: None,
            });
            raw.set(field::ATTACHMENTS, Some(FieldValue::Attachments(list)));
        })
    }

    fn update_attachment(
        &self,
        uri: &str,
        attachment_id: &str,
        file_name: &str,
        title: &str,
        data: &[u8],
    ) -> Result<()> {
        self.log("updateAttachment", &[uri, attachment_id, file_name, title]);
        self.state
            .lock()
            .unwrap()
            .attachments
            .insert((uri.to_string(), attachment_id.to_string()), data.to_vec());
        self.with_record(uri, |raw| {
            if let Some(FieldValue::Attachments(list)) = raw.get_mut(field::ATTACHMENTS) {
                for info in list.iter_mut().filter(|a| a.id == attachment_id) {
                    info.file_name = file_name.to_string();
                    info.title = Some(title.to_string());
                    info.length = Some(data.len() as u64);
                }
            }
        })
    }

    fn delete_attachment(&self, uri: &str, attachment_id: &str) -> Result<()> {
        self.log("deleteAttachment", &[uri, attachment_id]);
        self.state.lock().unwrap().attachments.remove(&(uri.to_string(), attachment_id.to_string()));
        self.with_record(uri, |raw| {
            let remaining = match raw.get(field::ATTACHMENTS) {
                Some(FieldValue::Attachments(list)) => {
                    list.iter().filter(|a| a.id != attachment_id).cloned().collect::<Vec<_>>()
                },
                _ => Vec::new(),
            };
            let value = (!remaining.is_empty()).then_some(FieldValue::Attachments(remaining));
            raw.set(field::ATTACHMENTS, value);
        })
    }

    fn move_work_item_to_document(
        &self,
        uri: &str,
        document_uri: &str,
        parent_uri: Option<&str>,
        order: Option<u32>,
    ) -> Result<()> {
        let order = order.map_or_else(|| "last".to_string(), |o| o.to_string());
        self.log("moveWorkItemToDocument", &[uri, document_uri, parent_uri.unwrap_or("-"), &order]);
        let location = format!("default:/{PROJECT}/.tracker/modules/{document_uri}/workitems/x");
        self.with_record(uri, |raw| raw.set(field::LOCATION, Some(FieldValue::from(location))))?;
        Ok(())
    }

    fn get_revisions(&self, uri: &str) -> Result<Vec<String>> {
        self.log("getRevisions", &[uri]);
        Ok(self.state.lock().unwrap().revisions.clone())
    }

    fn add_comment(&self, parent_uri: &str, title: Option<&str>, content: &RichText) -> Result<()> {
        self.log("addComment", &[parent_uri, title.unwrap_or("-"), content.text()]);
        let comment_uri = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            format!("comment-{}", state.next_id)
        };
        let owner = self
            .state
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|(uri, raw)| {
                uri.as_str() == parent_uri
                    || matches!(raw.get(field::COMMENTS), Some(FieldValue::Comments(list)) if list.iter().any(|c| c.uri == parent_uri))
            })
            .map(|(uri, _)| uri.clone())
            .ok_or_else(|| RemoteError::rpc("Tracker", "addComment", "unknown parent"))?;
        let is_reply = owner != parent_uri;
        self.with_record(&owner, |raw| {
            let mut list = match raw.get(field::COMMENTS) {
                Some(FieldValue::Comments(list)) => list.clone(),
                _ => Vec::new(),
            };
            if is_reply {
                for parent in list.iter_mut().filter(|c| c.uri == parent_uri) {
                    parent.child_comment_uris.push(comment_uri.clone());
                }
            }
            list.push(CommentRecord {
                uri: comment_uri.clone(),
                id: None,
                title: title.map(ToString::to_string),
                text: Some(content.clone()),
                author: None,
                created: None,
                parent_comment_uri: is_reply.then(|| parent_uri.to_string()),
                child_comment_uris: Vec::new(),
                resolved: false,
                tags: Vec::new(),
            });
            raw.set(field::COMMENTS, Some(FieldValue::Comments(list)));
        })
    }

    fn set_comment_tags(&self, comment_uri: &str, tags: &[String]) -> Result<()> {
        self.log("setCommentTags", &[comment_uri]);
        self.state.lock().unwrap().comment_tags.insert(comment_uri.to_string(), tags.to_vec());
        Ok(())
    }

    fn set_resolved_comment(&self, comment_uri: &str, resolved: bool) -> Result<()> {
        self.log("setResolvedComment", &[comment_uri, &resolved.to_string()]);
        self.state.lock().unwrap().resolved_comments.insert(comment_uri.to_string(), resolved);
        Ok(())
    }

    fn is_resolved_comment(&self, comment_uri: &str) -> Result<bool> {
        self.log("isResolvedComment", &[comment_uri]);
        Ok(self.state.lock().unwrap().resolved_comments.get(comment_uri).copied().unwrap_or(false))
    }
}

impl TestManagementService for FakeTracker {
    fn get_test_steps(&self, uri: &str) -> Result<Option<RawTestSteps>> {
        self.log("getTestSteps", &[uri]);
        Ok(self.stored_test_steps(uri))
    }

    fn set_test_steps(&self, uri: &str, steps: &[TestStep]) -> Result<()> {
        self.log("setTestSteps", &[uri]);
        let keys = self.state.lock().unwrap().test_step_columns.iter().map(|c| EnumOptionId::new(&c.id)).collect();
        self.set_test_steps_for(uri, RawTestSteps { keys, steps: steps.to_vec() });
        Ok(())
    }

    fn get_test_steps_configuration(&self, project_id: &str) -> Result<Vec<TestStepColumn>> {
        self.log("getTestStepsConfiguration", &[project_id]);
        Ok(self.state.lock().unwrap().test_step_columns.clone())
    }

    fn search_test_run_uris(&self, query: &str, sort: &str, limit: Option<usize>) -> Result<Vec<String>> {
        self.log("searchTestRunsWithFieldsLimited", &[query, sort]);
        let runs = self.state.lock().unwrap().test_runs.clone();
        Ok(match limit {
            Some(limit) => runs.into_iter().take(limit).collect(),
            None => runs,
        })
    }
}

impl Session for FakeTracker {
    fn server_url(&self) -> &str {
        "https://tracker.example.com/"
    }
}
