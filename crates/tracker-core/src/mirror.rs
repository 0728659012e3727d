//! Local mirror of a remote record: pristine snapshot plus mutable shadow.
//!
//! The snapshot is the last state known to match the server. The shadow is
//! what callers read and write. Saving sends `diff()`, the fields where the two
//! disagree, and the owner reloads to re-baseline.

use tracing::debug;
use tracker_types::models::{FieldDelta, FieldValue, RawRecord};
use tracker_types::schema::RecordSchema;
use tracker_types::{RecordError, Result};

/// Snapshot/shadow pair for one record.
#[derive(Debug, Clone)]
pub struct RecordMirror {
    schema: &'static RecordSchema,
    snapshot: RawRecord,
    shadow: RawRecord,
}

impl RecordMirror {
    /// Mirror a freshly fetched record. Shadow starts equal to the snapshot.
    pub fn new(schema: &'static RecordSchema, raw: RawRecord) -> Result<Self> {
        ensure_resolved(&raw)?;
        Ok(Self { schema, shadow: raw.clone(), snapshot: raw })
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    /// Last server-consistent state.
    pub fn snapshot(&self) -> &RawRecord {
        &self.snapshot
    }

    /// Caller-visible state.
    pub fn shadow(&self) -> &RawRecord {
        &self.shadow
    }

    /// Replace the snapshot with a freshly fetched record.
    ///
    /// Outside a deferred save the shadow is reset to the new snapshot. While
    /// `postponed`, pending edits are rebased: fields the caller changed keep
    /// the caller's value, every other field follows the server.
    pub fn load(&mut self, raw: RawRecord, postponed: bool) -> Result<()> {
        ensure_resolved(&raw)?;
        if postponed {
            self.shadow = self.rebased_onto(&raw);
        } else {
            self.shadow = raw.clone();
        }
        self.snapshot = raw;
        Ok(())
    }

    fn rebased_onto(&self, fresh: &RawRecord) -> RawRecord {
        let mut shadow = fresh.clone();
        for name in self.schema.names() {
            let edited = self.shadow.get(name);
            if edited != self.snapshot.get(name) {
                shadow.set(name, edited.cloned());
            }
        }
        shadow
    }

    /// Read a field of the shadow. Unknown names fail.
    pub fn get(&self, name: &str) -> Result<Option<&FieldValue>> {
        self.schema.require(name)?;
        Ok(self.shadow.get(name))
    }

    /// Mutable access to a present field of the shadow.
    pub fn get_mut(&mut self, name: &str) -> Result<Option<&mut FieldValue>> {
        self.schema.require(name)?;
        Ok(self.shadow.get_mut(name))
    }

    /// Write a field of the shadow. `None` clears it.
    pub fn set(&mut self, name: &str, value: Option<FieldValue>) -> Result<()> {
        self.schema.check(name, value.as_ref())?;
        self.shadow.set(name, value);
        Ok(())
    }

    /// Fields whose shadow value differs from the snapshot, with the new value.
    pub fn diff(&self) -> FieldDelta {
        let mut delta = FieldDelta::new();
        for name in self.schema.names() {
            let current = self.shadow.get(name);
            if current != self.snapshot.get(name) {
                delta.insert(name, current.cloned());
            }
        }
        delta
    }

    pub fn is_dirty(&self) -> bool {
        self.schema.names().any(|name| self.shadow.get(name) != self.snapshot.get(name))
    }

    /// Drop all local edits.
    pub fn revert(&mut self) {
        self.shadow = self.snapshot.clone();
    }

    /// Accept the shadow as the server's state after it took the update.
    pub fn commit(&mut self) {
        self.snapshot = self.shadow.clone();
    }

    /// Send the changed fields through `send` if there are any.
    ///
    /// Returns whether anything was sent; the caller reloads in that case.
    /// The shadow is never touched, so a failed send leaves the edits in place.
    pub fn flush<F>(&self, send: F) -> Result<bool>
    where
        F: FnOnce(&str, &FieldDelta) -> Result<()>,
    {
        let delta = self.diff();
        if delta.is_empty() {
            debug!(uri = ?self.snapshot.uri(), "nothing to flush");
            return Ok(false);
        }
        let uri = self
            .snapshot
            .uri()
            .ok_or_else(|| RecordError::MissingIdentity { field: "uri".to_string() })?;
        debug!(uri, fields = ?delta.field_names().collect::<Vec<_>>(), "flushing changed fields");
        send(uri, &delta)?;
        Ok(true)
    }
}

fn ensure_resolved(raw: &RawRecord) -> Result<()> {
    if raw.is_unresolvable() {
        let reference = raw.uri().or_else(|| raw.id()).unwrap_or("<unknown>").to_string();
        return Err(RecordError::Unresolvable { reference }.into());
    }
    Ok(())
}
