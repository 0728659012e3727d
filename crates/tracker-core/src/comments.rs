//! Comment threads on work items.

use std::fmt;

use tracker_types::models::{CommentRecord, FieldValue, RichText, UserRef};
use tracker_types::schema::field;
use tracker_types::Result;

use crate::work_item::WorkItem;

/// Markup of a new comment body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentFormat {
    #[default]
    Html,
    Plain,
}

impl CommentFormat {
    fn content(self, body: &str) -> RichText {
        match self {
            Self::Html => RichText::html(body),
            Self::Plain => RichText::plain(body),
        }
    }
}

/// Read-only view of one comment, borrowed from its work item.
#[derive(Clone, Copy)]
pub struct Comment<'a> {
    item: &'a WorkItem,
    record: &'a CommentRecord,
}

impl<'a> Comment<'a> {
    pub fn uri(&self) -> &'a str {
        &self.record.uri
    }

    pub fn title(&self) -> Option<&'a str> {
        self.record.title.as_deref()
    }

    pub fn text(&self) -> Option<&'a RichText> {
        self.record.text.as_ref()
    }

    pub fn author(&self) -> Option<&'a UserRef> {
        self.record.author.as_ref()
    }

    pub fn record(&self) -> &'a CommentRecord {
        self.record
    }

    pub fn is_reply(&self) -> bool {
        self.record.parent_comment_uri.is_some()
    }

    /// Direct replies, in the order the server lists them.
    pub fn replies(&self) -> Vec<Comment<'a>> {
        let all = self.item.comment_records();
        self.record
            .child_comment_uris
            .iter()
            .filter_map(|uri| all.iter().find(|c| &c.uri == uri))
            .map(|record| Comment { item: self.item, record })
            .collect()
    }

    pub fn set_tags(&self, tags: &[String]) -> Result<()> {
        self.item.session().set_comment_tags(self.uri(), tags)
    }

    /// Resolve or reopen the thread. Only valid on root comments.
    pub fn set_resolved(&self, resolved: bool) -> Result<()> {
        self.item.session().set_resolved_comment(self.uri(), resolved)
    }

    /// Whether the comment's thread is resolved, as the server reports it now.
    pub fn is_resolved(&self) -> Result<bool> {
        self.item.session().is_resolved_comment(self.uri())
    }
}

impl fmt::Debug for Comment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comment").field("item", &self.item.id()).field("uri", &self.record.uri).finish()
    }
}

impl WorkItem {
    fn comment_records(&self) -> &[CommentRecord] {
        match self.fields().get(field::COMMENTS) {
            Some(FieldValue::Comments(list)) => list,
            _ => &[],
        }
    }

    /// All comments, replies included.
    pub fn comments(&self) -> Vec<Comment<'_>> {
        self.comment_records().iter().map(|record| Comment { item: self, record }).collect()
    }

    /// Add a comment, or a reply when `parent_uri` names a comment. Replies
    /// carry no title, so `title` is ignored for them.
    pub fn add_comment(
        &mut self,
        title: Option<&str>,
        body: &str,
        parent_uri: Option<&str>,
        format: CommentFormat,
    ) -> Result<()> {
        self.ensure_live()?;
        let content = format.content(body);
        let (parent, title) = match parent_uri {
            Some(parent) => (parent.to_string(), None),
            None => (self.uri().to_string(), title),
        };
        self.session().add_comment(&parent, title, &content)?;
        self.reload()
    }
}
