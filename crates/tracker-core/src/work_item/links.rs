//! Links to other work items and hyperlinks.

use std::fmt;
use std::sync::Arc;

use tracker_types::models::{FieldValue, Hyperlink};
use tracker_types::schema::field;
use tracker_types::Result;

use super::WorkItem;
use crate::links::{LinkedEdges, RoleFilter};

/// Role of a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HyperlinkRole {
    InternalReference,
    ExternalReference,
    /// Project-specific role id
    Custom(String),
}

impl HyperlinkRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InternalReference => "internal reference",
            Self::ExternalReference => "external reference",
            Self::Custom(id) => id,
        }
    }
}

impl fmt::Display for HyperlinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HyperlinkRole {
    fn from(role: &str) -> Self {
        match role {
            "internal reference" => Self::InternalReference,
            "external reference" => Self::ExternalReference,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl WorkItem {
    /// Outgoing links passing `filter`, read from the last loaded state.
    pub fn linked_edges(&self, filter: impl Into<RoleFilter>) -> LinkedEdges<'_> {
        LinkedEdges::new(self.snapshot().links(field::LINKED_WORK_ITEMS), filter)
    }

    /// Incoming links passing `filter`, read from the last loaded state.
    pub fn back_linked_edges(&self, filter: impl Into<RoleFilter>) -> LinkedEdges<'_> {
        LinkedEdges::new(self.snapshot().links(field::LINKED_WORK_ITEMS_DERIVED), filter)
    }

    /// Link this item to `other` with `role`. Both items are reloaded.
    pub fn add_linked_item(&mut self, other: &mut WorkItem, role: &str) -> Result<()> {
        self.ensure_live()?;
        other.ensure_live()?;
        self.session.add_linked_item(&self.uri, &other.uri, role)?;
        self.reload()?;
        other.reload()
    }

    /// Remove the link to `other` with `role`. Without a role every link
    /// between the two items is removed, in both directions. Both items are
    /// reloaded.
    pub fn remove_linked_item(&mut self, other: &mut WorkItem, role: Option<&str>) -> Result<()> {
        self.ensure_live()?;
        other.ensure_live()?;
        if let Some(role) = role {
            self.session.remove_linked_item(&self.uri, &other.uri, Some(role))?;
        } else {
            let forward = roles_towards(self.snapshot().links(field::LINKED_WORK_ITEMS), &other.uri);
            let backward =
                roles_towards(self.snapshot().links(field::LINKED_WORK_ITEMS_DERIVED), &other.uri);
            for role in forward {
                self.session.remove_linked_item(&self.uri, &other.uri, role.as_deref())?;
            }
            for role in backward {
                self.session.remove_linked_item(&other.uri, &self.uri, role.as_deref())?;
            }
        }
        self.reload()?;
        other.reload()
    }

    /// Linked and back-linked items with their roles, forward links first.
    /// Links without a role are skipped. Each target is loaded as a new item.
    pub fn linked_items_with_roles(&self) -> Result<Vec<(String, WorkItem)>> {
        let raw = [field::LINKED_WORK_ITEMS, field::LINKED_WORK_ITEMS_DERIVED];
        let mut items = Vec::new();
        for link in raw.iter().filter_map(|name| self.snapshot().links(name)).flatten() {
            let Some(role) = &link.role else { continue };
            let item = WorkItem::from_uri(Arc::clone(&self.session), &link.work_item_uri)?;
            items.push((role.id.clone(), item));
        }
        Ok(items)
    }

    pub fn linked_items(&self) -> Result<Vec<WorkItem>> {
        Ok(self.linked_items_with_roles()?.into_iter().map(|(_, item)| item).collect())
    }

    pub fn hyperlinks(&self) -> &[Hyperlink] {
        match self.known(field::HYPERLINKS) {
            Some(FieldValue::Hyperlinks(links)) => links,
            _ => &[],
        }
    }

    pub fn add_hyperlink(&mut self, url: &str, role: HyperlinkRole) -> Result<()> {
        self.ensure_live()?;
        self.session.add_hyperlink(&self.uri, url, role.as_str())?;
        self.reload()
    }

    pub fn remove_hyperlink(&mut self, url: &str) -> Result<()> {
        self.ensure_live()?;
        self.session.remove_hyperlink(&self.uri, url)?;
        self.reload()
    }
}

/// Roles of the raw links pointing at `target`, `None` for role-less links.
fn roles_towards(raw: Option<&[tracker_types::RawLink]>, target: &str) -> Vec<Option<String>> {
    raw.unwrap_or_default()
        .iter()
        .filter(|link| link.work_item_uri == target)
        .map(|link| link.role.as_ref().map(|r| r.id.clone()))
        .collect()
}
