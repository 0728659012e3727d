//! Raw link structures as delivered by the server.

use serde::{Deserialize, Serialize};

use super::EnumOptionId;

/// One raw edge in a work item's linked (or derived) item collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLink {
    /// Link role; older records may omit it
    #[serde(default)]
    pub role: Option<EnumOptionId>,
    /// URI of the item on the other end
    #[serde(rename = "workItemURI")]
    pub work_item_uri: String,
    /// Whether the link is flagged as suspect
    #[serde(default)]
    pub suspect: bool,
    /// Pinned revision of the target, if any
    #[serde(default)]
    pub revision: Option<String>,
}

impl RawLink {
    pub fn new(role: impl Into<String>, work_item_uri: impl Into<String>) -> Self {
        Self {
            role: Some(EnumOptionId::new(role)),
            work_item_uri: work_item_uri.into(),
            suspect: false,
            revision: None,
        }
    }

    /// A link whose role sub-structure is absent.
    pub fn without_role(work_item_uri: impl Into<String>) -> Self {
        Self { role: None, work_item_uri: work_item_uri.into(), suspect: false, revision: None }
    }
}

/// Hyperlink attached to a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// Hyperlink role ("internal reference", "external reference", or custom)
    #[serde(default)]
    pub role: Option<EnumOptionId>,
    /// Target URL
    pub uri: String,
}
