use serde::{Deserialize, Serialize};

use super::{EnumOptionId, RichText};

/// One row of a test case's step table; one value per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub values: Vec<RichText>,
}

/// Test steps as returned by the test management service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTestSteps {
    /// Column identifiers the steps were stored with
    #[serde(default)]
    pub keys: Vec<EnumOptionId>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

/// Column configured for test steps in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStepColumn {
    pub id: String,
    pub name: String,
}
