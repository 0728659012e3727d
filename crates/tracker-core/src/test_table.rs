//! Editable test step table of a test case work item.
//!
//! Build one with [`crate::WorkItem::test_table`], edit it locally, then commit
//! it with [`crate::WorkItem::set_test_steps`].

use std::collections::BTreeMap;

use tracker_types::models::{RawTestSteps, RichText, TestStep};
use tracker_types::TestStepError;

/// Column id -> cell text of one step.
pub type TestStepRow = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestTable {
    columns: Vec<String>,
    steps: Vec<TestStep>,
}

impl TestTable {
    /// Empty table with the given column ids.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, steps: Vec::new() }
    }

    /// Table seeded from stored steps.
    ///
    /// Columns come from the stored keys when there are stored steps, else from
    /// the project's configured columns. `clear` keeps only the columns.
    pub fn from_raw(raw: Option<RawTestSteps>, configured: Vec<String>, clear: bool) -> Self {
        let Some(raw) = raw else {
            return Self::new(configured);
        };
        let columns = if !raw.keys.is_empty() && !raw.steps.is_empty() {
            raw.keys.into_iter().map(|k| k.id).collect()
        } else {
            configured
        };
        let steps = if clear { Vec::new() } else { raw.steps };
        Self { columns, steps }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[TestStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&TestStep> {
        self.steps.get(index)
    }

    /// Cell texts of one step keyed by column id; empty cells read as `""`.
    pub fn row(&self, index: usize) -> Option<TestStepRow> {
        let step = self.steps.get(index)?;
        Some(
            self.columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let text = step.values.get(i).map(RichText::text).unwrap_or_default();
                    (col.clone(), text.to_string())
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> impl Iterator<Item = TestStepRow> + '_ {
        (0..self.steps.len()).filter_map(|i| self.row(i))
    }

    fn build_step<S: AsRef<str>>(&self, values: &[S]) -> Result<TestStep, TestStepError> {
        if values.len() != self.columns.len() {
            return Err(TestStepError::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: values.len(),
                columns: self.columns.clone(),
            });
        }
        Ok(TestStep { values: values.iter().map(|v| RichText::html(v.as_ref())).collect() })
    }

    /// Insert a step before `position`, or append when `position` is `None`.
    pub fn insert_step<S: AsRef<str>>(
        &mut self,
        position: Option<usize>,
        values: &[S],
    ) -> Result<(), TestStepError> {
        let step = self.build_step(values)?;
        match position {
            None => self.steps.push(step),
            Some(index) if index <= self.steps.len() => self.steps.insert(index, step),
            Some(index) => {
                return Err(TestStepError::IndexOutOfRange { index, len: self.steps.len() })
            },
        }
        Ok(())
    }

    pub fn add_step<S: AsRef<str>>(&mut self, values: &[S]) -> Result<(), TestStepError> {
        self.insert_step(None, values)
    }

    pub fn remove_step(&mut self, index: usize) -> Result<TestStep, TestStepError> {
        if index >= self.steps.len() {
            return Err(TestStepError::IndexOutOfRange { index, len: self.steps.len() });
        }
        Ok(self.steps.remove(index))
    }

    /// Replace the step at `index` in place.
    pub fn update_step<S: AsRef<str>>(&mut self, index: usize, values: &[S]) -> Result<(), TestStepError> {
        let step = self.build_step(values)?;
        let len = self.steps.len();
        let slot = self.steps.get_mut(index).ok_or(TestStepError::IndexOutOfRange { index, len })?;
        *slot = step;
        Ok(())
    }

    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }
}

impl AsRef<[TestStep]> for TestTable {
    fn as_ref(&self) -> &[TestStep] {
        &self.steps
    }
}
