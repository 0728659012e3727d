//! Deferred-save scope: suspends flushing and guarantees one flush on exit.

use std::ops::{Deref, DerefMut};

use tracing::warn;
use tracker_types::Result;

use crate::work_item::WorkItem;

/// Postponement depth of one item. Only the outermost exit flushes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeferState {
    depth: u32,
}

impl DeferState {
    pub(crate) fn enter(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// Leave one level. Returns true when the outermost level was left.
    pub(crate) fn exit(&mut self) -> bool {
        match self.depth {
            0 => false,
            1 => {
                self.depth = 0;
                true
            },
            _ => {
                self.depth -= 1;
                false
            },
        }
    }

    pub(crate) const fn is_postponed(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn clear(&mut self) {
        self.depth = 0;
    }
}

/// RAII guard returned by [`WorkItem::with_deferred_save`].
///
/// Dereferences to the item. Saves issued through the guard are no-ops; the
/// pending changes go out in a single update when the guard is finished or
/// dropped. Use [`DeferredSave::finish`] to observe the flush result; on the
/// drop path a failed flush is logged and the item stays dirty.
#[must_use = "dropping the guard immediately flushes"]
pub struct DeferredSave<'a> {
    item: &'a mut WorkItem,
    finished: bool,
}

impl<'a> DeferredSave<'a> {
    pub(crate) fn new(item: &'a mut WorkItem) -> Self {
        item.enter_deferred();
        Self { item, finished: false }
    }

    /// Leave the scope and flush pending changes.
    pub fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.item.exit_deferred()
    }
}

impl Deref for DeferredSave<'_> {
    type Target = WorkItem;

    fn deref(&self) -> &WorkItem {
        self.item
    }
}

impl DerefMut for DeferredSave<'_> {
    fn deref_mut(&mut self) -> &mut WorkItem {
        self.item
    }
}

impl Drop for DeferredSave<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.item.exit_deferred() {
            warn!(uri = %self.item.uri(), error = %e, "Deferred save failed, changes kept locally");
        }
    }
}
