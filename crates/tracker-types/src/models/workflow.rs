use serde::{Deserialize, Serialize};

/// A workflow action currently available on a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAction {
    /// Numeric id used to perform the action
    pub action_id: i32,
    /// Display name
    pub action_name: String,
    /// Identifier from the workflow configuration
    pub native_action_id: String,
    /// Fields that must be filled before the action may run
    #[serde(default)]
    pub required_features: Vec<String>,
}

/// Initial workflow action for a new record of a given type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialAction {
    /// Fields that must be supplied when creating the record
    #[serde(default)]
    pub required_features: Vec<String>,
}
