//! The user-facing work item.
//!
//! A [`WorkItem`] composes a [`RecordMirror`], the deferred-save state and
//! edge traversal on top of a [`Session`]. Field access goes through the
//! mirror's shadow; every other operation is forwarded to the session and
//! followed by a reload.

mod attachments;
mod fields;
mod links;
mod people;
mod test_steps;
mod workflow;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::{debug, info};
use tracker_types::models::{EnumOptionId, FieldDelta, FieldValue, ProjectRef, RawRecord};
use tracker_types::schema::{field, WORK_ITEM};
use tracker_types::{RecordError, RemoteError, Result, TrackerError};

use crate::deferred::{DeferState, DeferredSave};
use crate::mirror::RecordMirror;
use crate::service::Session;
use crate::test_table::TestTable;

pub use links::HyperlinkRole;

/// Observable synchronisation state of a [`WorkItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// Shadow equals snapshot
    Loaded,
    /// Local edits not yet saved
    Dirty,
    /// Inside a deferred-save scope
    Postponed,
}

/// A work item mirrored from the tracker.
pub struct WorkItem {
    session: Arc<dyn Session>,
    project_id: String,
    id: String,
    uri: String,
    mirror: RecordMirror,
    defer: DeferState,
    deleted: bool,
    test_table: Option<TestTable>,
    revision: Option<u64>,
}

impl WorkItem {
    /// Load a work item by URI.
    pub fn from_uri(session: Arc<dyn Session>, uri: &str) -> Result<Self> {
        let raw = session.get_work_item_by_uri(uri)?;
        Self::assemble(session, raw, None)
    }

    /// Load a work item by project and id.
    pub fn from_id(session: Arc<dyn Session>, project_id: &str, id: &str) -> Result<Self> {
        let raw = session.get_work_item_by_id(project_id, id)?;
        Self::assemble(session, raw, Some(project_id))
    }

    /// Wrap a record that was already fetched, e.g. by a query.
    pub fn from_raw(session: Arc<dyn Session>, raw: RawRecord) -> Result<Self> {
        Self::assemble(session, raw, None)
    }

    /// Create a new work item of `type_id` in a project and load it.
    ///
    /// Every entry of `fields` must be a schema field with a value of the
    /// declared kind, and the fields the type's initial workflow action
    /// requires must all be present.
    pub fn create(
        session: Arc<dyn Session>,
        project_id: &str,
        type_id: &str,
        fields: RawRecord,
    ) -> Result<Self> {
        for (name, value) in fields.iter() {
            WORK_ITEM.check(name, Some(value)).map_err(|e| match e {
                RecordError::UnknownField { field, .. } => RecordError::UnknownNewField { field },
                other => other,
            })?;
        }

        let initial = session.get_initial_workflow_action(project_id, type_id)?;
        let missing: Vec<String> = initial
            .required_features
            .into_iter()
            .filter(|name| fields.get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RecordError::MissingRequiredFields { fields: missing }.into());
        }

        let mut record = RawRecord::new()
            .with(field::TYPE, EnumOptionId::new(type_id))
            .with(field::PROJECT, FieldValue::Project(ProjectRef::new(project_id)));
        for (name, value) in fields.iter() {
            record.set(name, Some(value.clone()));
        }

        let uri = session.create_work_item(&record)?;
        info!(project = project_id, r#type = type_id, uri = %uri, "Created work item");
        Self::from_uri(session, &uri)
    }

    fn assemble(session: Arc<dyn Session>, raw: RawRecord, project_hint: Option<&str>) -> Result<Self> {
        let mirror = RecordMirror::new(&WORK_ITEM, raw)?;
        let snapshot = mirror.snapshot();
        let id = snapshot.id().ok_or_else(|| missing(field::ID))?.to_string();
        let uri = snapshot.uri().ok_or_else(|| missing(field::URI))?.to_string();
        let project_id = snapshot
            .project_id()
            .or(project_hint)
            .ok_or_else(|| missing(field::PROJECT))?
            .to_string();
        Ok(Self {
            session,
            project_id,
            id,
            uri,
            mirror,
            defer: DeferState::default(),
            deleted: false,
            test_table: None,
            revision: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Browser URL of the item.
    pub fn url(&self) -> String {
        format!(
            "{}/#/project/{}/workitem?id={}",
            self.session.server_url().trim_end_matches('/'),
            self.project_id,
            self.id
        )
    }

    pub fn state(&self) -> ItemState {
        if self.defer.is_postponed() {
            ItemState::Postponed
        } else if self.mirror.is_dirty() {
            ItemState::Dirty
        } else {
            ItemState::Loaded
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.mirror.is_dirty()
    }

    /// Whether the item was deleted through this handle.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Pending changes: fields whose value differs from the last load.
    pub fn diff(&self) -> FieldDelta {
        self.mirror.diff()
    }

    /// Field values as last loaded from the server.
    pub fn snapshot(&self) -> &RawRecord {
        self.mirror.snapshot()
    }

    /// Current field values including local edits.
    pub fn fields(&self) -> &RawRecord {
        self.mirror.shadow()
    }

    /// Read a schema field. Unknown names fail with `RecordError::UnknownField`.
    pub fn field(&self, name: &str) -> Result<Option<&FieldValue>> {
        self.mirror.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Result<Option<&mut FieldValue>> {
        self.mirror.get_mut(name)
    }

    /// Write a schema field locally; `None` clears it. Nothing is sent until
    /// [`WorkItem::save`].
    pub fn set_field(&mut self, name: &str, value: impl Into<Option<FieldValue>>) -> Result<()> {
        self.mirror.set(name, value.into())
    }

    /// Send changed fields to the server and reload.
    ///
    /// A no-op inside a deferred-save scope or when nothing changed. When the
    /// update fails the local edits are kept so the caller can retry or
    /// revert. Once the server has taken the update the item is clean, even
    /// if the reload that follows fails.
    pub fn save(&mut self) -> Result<()> {
        if self.defer.is_postponed() {
            debug!(uri = %self.uri, "Save postponed");
            return Ok(());
        }
        if !self.mirror.is_dirty() {
            return Ok(());
        }
        self.ensure_live()?;
        let session = &self.session;
        let sent = self.mirror.flush(|uri, changes| {
            session.update_work_item(uri, changes).map_err(|e| rejected(uri, e))
        })?;
        if sent {
            self.mirror.commit();
            self.reload()?;
        }
        Ok(())
    }

    /// Fetch the record again and re-baseline the mirror.
    ///
    /// Inside a deferred-save scope local edits survive the reload.
    pub fn reload(&mut self) -> Result<()> {
        self.ensure_live()?;
        let raw = match self.session.get_work_item_by_uri(&self.uri) {
            Ok(raw) if raw.is_unresolvable() => return Err(self.stale()),
            Err(TrackerError::Record(RecordError::Unresolvable { .. })) => return Err(self.stale()),
            other => other?,
        };
        self.mirror.load(raw, self.defer.is_postponed())?;
        debug!(uri = %self.uri, postponed = self.defer.is_postponed(), "Reloaded work item");
        Ok(())
    }

    /// Drop local edits and any postponement, then reload.
    pub fn revert_changes(&mut self) -> Result<()> {
        self.defer.clear();
        self.mirror.revert();
        self.reload()
    }

    /// Legacy postponement toggle. Switching it off flushes.
    pub fn set_save_postponed(&mut self, postponed: bool) -> Result<()> {
        if postponed {
            if !self.defer.is_postponed() {
                self.defer.enter();
            }
            Ok(())
        } else {
            self.defer.clear();
            self.save()
        }
    }

    pub fn is_save_postponed(&self) -> bool {
        self.defer.is_postponed()
    }

    /// Suspend saving until the returned guard is finished or dropped.
    pub fn with_deferred_save(&mut self) -> DeferredSave<'_> {
        DeferredSave::new(self)
    }

    pub(crate) fn enter_deferred(&mut self) {
        self.defer.enter();
    }

    pub(crate) fn exit_deferred(&mut self) -> Result<()> {
        if self.defer.exit() {
            self.save()
        } else {
            Ok(())
        }
    }

    /// Delete the record on the server. The handle becomes stale.
    ///
    /// Document references to the item are left in place.
    pub fn delete(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.session.delete_work_item(&self.uri)?;
        self.deleted = true;
        self.defer.clear();
        info!(uri = %self.uri, "Deleted work item");
        Ok(())
    }

    /// Move the item into a document, under `parent_uri` or at the top level.
    /// `order` of `None` places it last.
    pub fn move_to_document(
        &mut self,
        document_uri: &str,
        parent_uri: Option<&str>,
        order: Option<u32>,
    ) -> Result<()> {
        self.ensure_live()?;
        self.session.move_work_item_to_document(&self.uri, document_uri, parent_uri, order)?;
        self.reload()
    }

    /// Latest revision number. Fetched once, then cached.
    pub fn last_revision_number(&mut self) -> Result<u64> {
        if let Some(revision) = self.revision {
            return Ok(revision);
        }
        self.ensure_live()?;
        let revisions = self.session.get_revisions(&self.uri)?;
        let revision = revisions
            .last()
            .and_then(|r| r.parse::<u64>().ok())
            .ok_or_else(|| RemoteError::InvalidResponse {
                operation: "getRevisions".to_string(),
                message: format!("no numeric revision for {}", self.uri),
            })?;
        self.revision = Some(revision);
        Ok(revision)
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.deleted {
            return Err(self.stale());
        }
        Ok(())
    }

    fn stale(&self) -> TrackerError {
        RecordError::Stale { uri: self.uri.clone() }.into()
    }

    /// Field of the shadow that the schema is known to contain.
    fn known(&self, name: &'static str) -> Option<&FieldValue> {
        self.mirror.shadow().get(name)
    }
}

fn missing(field: &str) -> TrackerError {
    RecordError::MissingIdentity { field: field.to_string() }.into()
}

/// A failed partial update is reported as a rejection of that record.
fn rejected(uri: &str, err: TrackerError) -> TrackerError {
    match err {
        TrackerError::Remote(RemoteError::Rpc { message, .. }) => {
            RemoteError::UpdateRejected { uri: uri.to_string(), message }.into()
        },
        other => other,
    }
}

/// Result of a best-effort probe: failures degrade to the default value.
pub(crate) fn best_effort<T: Default>(probe: &str, uri: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        debug!(probe, uri, error = %e, "Probe failed, using empty result");
        T::default()
    })
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.mirror.shadow() == other.mirror.shadow()
    }
}

impl Hash for WorkItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.title().unwrap_or_default())
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("uri", &self.uri)
            .field("project_id", &self.project_id)
            .field("state", &self.state())
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}
