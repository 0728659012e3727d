//! Field values carried by raw records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AttachmentInfo, Approval, CommentRecord, Hyperlink, RawLink};

/// Reference to an enumeration option (status, type, role, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumOptionId {
    /// Option identifier
    pub id: String,
}

impl EnumOptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for EnumOptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Formatted text (descriptions, comments, test step cells).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichText {
    /// MIME type, `text/html` or `text/plain`
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text body; the server reports empty bodies as absent
    pub content: Option<String>,
    /// Whether the server had to drop formatting
    #[serde(default)]
    pub content_lossy: bool,
}

impl RichText {
    pub const HTML: &'static str = "text/html";
    pub const PLAIN: &'static str = "text/plain";

    /// Html text that is not lossy.
    pub fn html(content: impl Into<String>) -> Self {
        Self { content_type: Self::HTML.to_string(), content: Some(content.into()), content_lossy: false }
    }

    /// Plain text that is not lossy.
    pub fn plain(content: impl Into<String>) -> Self {
        Self { content_type: Self::PLAIN.to_string(), content: Some(content.into()), content_lossy: false }
    }

    /// Body text, empty when absent.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Reference to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Login identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Server URI of the user object
    #[serde(default)]
    pub uri: Option<String>,
    /// Set when the server could not resolve the user
    #[serde(default)]
    pub unresolvable: bool,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None, email: None, uri: None, unresolvable: false }
    }
}

/// Reference to the owning project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Server URI of the project
    #[serde(default)]
    pub uri: Option<String>,
}

impl ProjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None, uri: None }
    }
}

/// Kind of a field slot, as declared by a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Duration,
    Enum,
    EnumList,
    Rich,
    User,
    Users,
    Project,
    Links,
    Hyperlinks,
    Attachments,
    Approvals,
    Comments,
    Custom,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Duration => "duration",
            Self::Enum => "enum",
            Self::EnumList => "enum_list",
            Self::Rich => "rich",
            Self::User => "user",
            Self::Users => "users",
            Self::Project => "project",
            Self::Links => "links",
            Self::Hyperlinks => "hyperlinks",
            Self::Attachments => "attachments",
            Self::Approvals => "approvals",
            Self::Comments => "comments",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field value. Absent values are modelled as `Option::None` by the
/// containers, never as a variant.
///
/// Equality is structural, which is what the change tracker diffs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// Durations are kept in the server's textual form ("1d 4h")
    Duration(String),
    Enum(EnumOptionId),
    EnumList(Vec<EnumOptionId>),
    Rich(RichText),
    User(UserRef),
    Users(Vec<UserRef>),
    Project(ProjectRef),
    Links(Vec<RawLink>),
    Hyperlinks(Vec<Hyperlink>),
    Attachments(Vec<AttachmentInfo>),
    Approvals(Vec<Approval>),
    Comments(Vec<CommentRecord>),
    /// Custom fields keyed by their configured key
    Custom(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Date(_) => FieldKind::Date,
            Self::DateTime(_) => FieldKind::DateTime,
            Self::Duration(_) => FieldKind::Duration,
            Self::Enum(_) => FieldKind::Enum,
            Self::EnumList(_) => FieldKind::EnumList,
            Self::Rich(_) => FieldKind::Rich,
            Self::User(_) => FieldKind::User,
            Self::Users(_) => FieldKind::Users,
            Self::Project(_) => FieldKind::Project,
            Self::Links(_) => FieldKind::Links,
            Self::Hyperlinks(_) => FieldKind::Hyperlinks,
            Self::Attachments(_) => FieldKind::Attachments,
            Self::Approvals(_) => FieldKind::Approvals,
            Self::Comments(_) => FieldKind::Comments,
            Self::Custom(_) => FieldKind::Custom,
        }
    }

    /// Shorthand for an enum option value.
    pub fn enum_option(id: impl Into<String>) -> Self {
        Self::Enum(EnumOptionId::new(id))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Duration(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumOptionId> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_rich(&self) -> Option<&RichText> {
        match self {
            Self::Rich(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<EnumOptionId> for FieldValue {
    fn from(v: EnumOptionId) -> Self {
        Self::Enum(v)
    }
}

impl From<RichText> for FieldValue {
    fn from(v: RichText) -> Self {
        Self::Rich(v)
    }
}
