use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RichText, UserRef};

/// A comment as stored in a work item's `comments` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    /// Server URI of the comment
    pub uri: String,
    /// Comment identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Title; replies have none
    #[serde(default)]
    pub title: Option<String>,
    /// Body
    #[serde(default)]
    pub text: Option<RichText>,
    /// Author
    #[serde(default)]
    pub author: Option<UserRef>,
    /// Creation time
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// URI of the comment this one replies to
    #[serde(rename = "parentCommentURI", default)]
    pub parent_comment_uri: Option<String>,
    /// URIs of direct replies
    #[serde(rename = "childCommentURIs", default)]
    pub child_comment_uris: Vec<String>,
    /// Whether the thread is resolved
    #[serde(default)]
    pub resolved: bool,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}
