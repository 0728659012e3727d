use tracker_types::models::{FieldValue, UserRef};
use tracker_types::schema::field;
use tracker_types::Result;

use super::WorkItem;

impl WorkItem {
    pub fn approver_users(&self) -> Vec<&UserRef> {
        match self.known(field::APPROVALS) {
            Some(FieldValue::Approvals(approvals)) => approvals.iter().map(|a| &a.user).collect(),
            _ => Vec::new(),
        }
    }

    /// Assigned users the server could resolve.
    pub fn assigned_users(&self) -> Vec<&UserRef> {
        match self.known(field::ASSIGNEE) {
            Some(FieldValue::Users(users)) => users.iter().filter(|u| !u.unresolvable).collect(),
            _ => Vec::new(),
        }
    }

    /// Add an approver. With `remove_others` the user becomes the only one.
    pub fn add_approvee(&mut self, user_id: &str, remove_others: bool) -> Result<()> {
        self.ensure_live()?;
        if remove_others {
            let current: Vec<String> = self.approver_users().into_iter().map(|u| u.id.clone()).collect();
            for id in current {
                self.session.remove_approvee(&self.uri, &id)?;
            }
        }
        self.session.add_approvee(&self.uri, user_id)?;
        self.reload()
    }

    pub fn remove_approvee(&mut self, user_id: &str) -> Result<()> {
        self.ensure_live()?;
        self.session.remove_approvee(&self.uri, user_id)?;
        self.reload()
    }

    /// Add an assignee. With `remove_others` the user becomes the only one.
    pub fn add_assignee(&mut self, user_id: &str, remove_others: bool) -> Result<()> {
        self.ensure_live()?;
        if remove_others {
            let current: Vec<String> = self.assigned_users().into_iter().map(|u| u.id.clone()).collect();
            for id in current {
                self.session.remove_assignee(&self.uri, &id)?;
            }
        }
        self.session.add_assignee(&self.uri, user_id)?;
        self.reload()
    }

    pub fn remove_assignee(&mut self, user_id: &str) -> Result<()> {
        self.ensure_live()?;
        self.session.remove_assignee(&self.uri, user_id)?;
        self.reload()
    }
}
