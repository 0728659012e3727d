//! Test steps of test case work items.

use tracker_types::models::{RawTestSteps, RichText, TestStep};
use tracker_types::{Result, TestStepError};

use super::{best_effort, WorkItem};
use crate::test_table::TestTable;

/// Custom field key that marks a type as carrying test steps.
pub const TEST_STEPS_KEY: &str = "testSteps";

impl WorkItem {
    /// Whether the item's type carries test steps.
    pub fn has_test_steps(&self) -> Result<bool> {
        self.ensure_live()?;
        Ok(self.session.get_custom_field_keys(&self.uri)?.iter().any(|k| k == TEST_STEPS_KEY))
    }

    fn require_test_steps(&self) -> Result<()> {
        if self.has_test_steps()? {
            Ok(())
        } else {
            Err(TestStepError::NoTestStepField { id: self.id.clone() }.into())
        }
    }

    /// Stored steps as returned by the server; `None` when there are none or
    /// they cannot be read.
    pub fn raw_test_steps(&self) -> Option<RawTestSteps> {
        if !best_effort("test step field", &self.uri, self.has_test_steps()) {
            return None;
        }
        best_effort("test steps", &self.uri, self.session.get_test_steps(&self.uri))
    }

    /// Display names of the project's test step columns.
    pub fn test_step_header(&self) -> Result<Vec<String>> {
        self.require_test_steps()?;
        let columns = self.session.get_test_steps_configuration(&self.project_id)?;
        Ok(columns.into_iter().map(|c| c.name).collect())
    }

    /// Ids of the project's test step columns.
    pub fn test_step_header_ids(&self) -> Result<Vec<String>> {
        self.require_test_steps()?;
        let columns = self.session.get_test_steps_configuration(&self.project_id)?;
        Ok(columns.into_iter().map(|c| c.id).collect())
    }

    fn build_test_table(&self, clear: bool) -> Result<TestTable> {
        let raw = self.raw_test_steps();
        let stored_columns = raw.as_ref().is_some_and(|r| !r.keys.is_empty() && !r.steps.is_empty());
        let configured = if stored_columns { Vec::new() } else { self.test_step_header_ids()? };
        Ok(TestTable::from_raw(raw, configured, clear))
    }

    /// Editable copy of the stored steps. With `clear` only the columns are
    /// kept, for rewriting a sequence from scratch. Commit the result with
    /// [`WorkItem::set_test_steps`].
    pub fn test_table(&mut self, clear: bool) -> Result<TestTable> {
        self.require_test_steps()?;
        let table = self.build_test_table(clear)?;
        self.test_table = Some(table.clone());
        Ok(table)
    }

    /// Replace the stored steps.
    ///
    /// Every step needs one cell per configured column, each non-lossy html.
    /// Empty cells are sent as `""` since the server rejects absent content.
    pub fn set_test_steps(&mut self, steps: impl AsRef<[TestStep]>) -> Result<()> {
        let steps = steps.as_ref();
        if steps.is_empty() {
            return Err(TestStepError::Empty.into());
        }
        let columns = self.test_step_header_ids()?;
        let normalized = steps
            .iter()
            .enumerate()
            .map(|(index, step)| normalize_step(index, step, &columns))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.session.set_test_steps(&self.uri, &normalized)?;
        self.reload()
    }

    fn edit_test_steps<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut TestTable) -> std::result::Result<(), TestStepError>,
    {
        self.require_test_steps()?;
        let mut table = match self.test_table.take() {
            Some(table) => table,
            None => self.build_test_table(false)?,
        };
        let result = match edit(&mut table) {
            Ok(()) => self.set_test_steps(&table),
            Err(e) => Err(e.into()),
        };
        self.test_table = Some(table);
        result
    }

    /// Append a step and commit the table.
    pub fn add_test_step<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        self.edit_test_steps(|table| table.add_step(values))
    }

    pub fn remove_test_step(&mut self, index: usize) -> Result<()> {
        self.edit_test_steps(|table| table.remove_step(index).map(drop))
    }

    /// Replace the step at `index` and commit the table.
    pub fn update_test_step<S: AsRef<str>>(&mut self, index: usize, values: &[S]) -> Result<()> {
        self.edit_test_steps(|table| table.update_step(index, values))
    }

    /// Cached step table; `None` for items without test steps.
    pub fn test_steps(&mut self) -> Result<Option<&TestTable>> {
        if !self.has_test_steps()? {
            return Ok(None);
        }
        if self.test_table.is_none() {
            self.test_table = Some(self.build_test_table(false)?);
        }
        Ok(self.test_table.as_ref())
    }

    /// URIs of test runs that executed this test case, by creation date.
    pub fn test_runs(&self, limit: Option<usize>) -> Result<Option<Vec<String>>> {
        if !self.has_test_steps()? {
            return Ok(None);
        }
        self.session.search_test_run_uris(&self.id, "Created", limit).map(Some)
    }
}

fn normalize_step(index: usize, step: &TestStep, columns: &[String]) -> std::result::Result<TestStep, TestStepError> {
    if step.values.len() != columns.len() {
        return Err(TestStepError::ColumnCountMismatch {
            expected: columns.len(),
            actual: step.values.len(),
            columns: columns.to_vec(),
        });
    }
    let values = step
        .values
        .iter()
        .enumerate()
        .map(|(column, cell)| match &cell.content {
            None => Ok(RichText::html("")),
            Some(_) if cell.content_type == RichText::HTML && !cell.content_lossy => Ok(cell.clone()),
            Some(_) => Err(TestStepError::InvalidCell { step: index, column }),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(TestStep { values })
}
