use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EnumOptionId, UserRef};

/// Metadata of a file attached to a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    /// Attachment identifier, unique within the work item
    pub id: String,
    /// Stored file name
    pub file_name: String,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub length: Option<u64>,
    /// Server URI of the attachment
    #[serde(default)]
    pub uri: Option<String>,
    /// Last update time
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    /// Uploader
    #[serde(default)]
    pub author: Option<UserRef>,
}

/// Approval entry of a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// Approving user
    pub user: UserRef,
    /// Approval status ("waiting", "approved", "disapproved")
    #[serde(default)]
    pub status: Option<EnumOptionId>,
}
