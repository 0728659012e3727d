//! Enumerations, custom field keys and workflow actions.

use tracker_types::models::{EnumOptionId, FieldValue, WorkflowAction};
use tracker_types::schema::field;
use tracker_types::Result;

use super::{best_effort, WorkItem};

impl WorkItem {
    fn type_enum(&self, suffix: &str) -> Vec<String> {
        let Some(type_id) = self.type_id() else {
            return Vec::new();
        };
        let enum_id = format!("{type_id}-{suffix}");
        let options = self.session.get_enum_options(&self.project_id, &enum_id);
        best_effort("enum options", &self.uri, options).into_iter().map(|o| o.id).collect()
    }

    /// Status options of this item's type; empty when they cannot be listed.
    pub fn status_enum(&self) -> Vec<String> {
        self.type_enum("status")
    }

    pub fn resolution_enum(&self) -> Vec<String> {
        self.type_enum("resolution")
    }

    pub fn severity_enum(&self) -> Vec<String> {
        self.type_enum("severity")
    }

    /// Custom field keys the item may carry; empty when they cannot be listed.
    pub fn allowed_custom_keys(&self) -> Vec<String> {
        best_effort("custom field keys", &self.uri, self.session.get_custom_field_keys(&self.uri))
    }

    pub fn is_custom_field_allowed(&self, key: &str) -> bool {
        self.allowed_custom_keys().iter().any(|k| k == key)
    }

    /// Statuses the item can currently move to.
    pub fn available_status(&self) -> Result<Vec<String>> {
        self.ensure_live()?;
        let options = self.session.get_available_enum_option_ids(&self.uri, field::STATUS)?;
        Ok(options.into_iter().map(|o| o.id).collect())
    }

    /// Workflow actions available on the item, with details.
    pub fn available_actions(&self) -> Result<Vec<WorkflowAction>> {
        self.ensure_live()?;
        self.session.get_available_actions(&self.uri)
    }

    /// Native ids of the available workflow actions.
    pub fn available_action_names(&self) -> Result<Vec<String>> {
        Ok(self.available_actions()?.into_iter().map(|a| a.native_action_id).collect())
    }

    /// Perform the available action whose native id or display name is
    /// `name`. Returns false when no such action is available.
    pub fn perform_action(&mut self, name: &str) -> Result<bool> {
        let action = self
            .available_actions()?
            .into_iter()
            .find(|a| a.native_action_id == name || a.action_name == name);
        match action {
            Some(action) => {
                self.perform_action_id(action.action_id)?;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    pub fn perform_action_id(&mut self, action_id: i32) -> Result<()> {
        self.ensure_live()?;
        self.session.perform_workflow_action(&self.uri, action_id)?;
        self.reload()
    }

    /// Set the status directly and save, bypassing workflow actions.
    /// Returns false, changing nothing, when `status` is not available.
    pub fn set_status(&mut self, status: &str) -> Result<bool> {
        if !self.available_status()?.iter().any(|s| s == status) {
            return Ok(false);
        }
        self.set_field(field::STATUS, FieldValue::Enum(EnumOptionId::new(status)))?;
        self.save()?;
        Ok(true)
    }
}
