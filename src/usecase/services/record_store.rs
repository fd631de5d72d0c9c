use tracing::debug;

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::dataset::Dataset;
use crate::usecase::ports::error::EngineError;
use crate::usecase::ports::parser::ParsedTable;

/// Sole owner of the current dataset. Each mutation swaps in a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    dataset: Option<Dataset>,
    dirty: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the dataset wholesale. On error the previous dataset stays.
    pub fn load(&mut self, table: ParsedTable) -> Result<&Dataset, EngineError> {
        let dataset = Dataset::new(table.columns, table.rows)?;
        debug!(
            columns = dataset.columns().len(),
            rows = dataset.len(),
            "loaded dataset"
        );
        self.dirty = false;
        Ok(self.dataset.insert(dataset))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn columns(&self) -> &[String] {
        self.dataset
            .as_ref()
            .map(Dataset::columns)
            .unwrap_or_default()
    }

    fn current(&self) -> Result<&Dataset, EngineError> {
        self.dataset.as_ref().ok_or(EngineError::NoUsableData)
    }

    pub fn edit_cell(
        &mut self,
        row: usize,
        column: &str,
        value: impl Into<CellValue>,
    ) -> Result<(), EngineError> {
        let next = self.current()?.with_cell(row, column, value.into())?;
        debug!(row, column, "edited cell");
        self.replace(next);
        Ok(())
    }

    /// Prepends a row with every column set to the empty string.
    pub fn insert_row(&mut self) -> Result<(), EngineError> {
        let next = self.current()?.with_blank_row_first();
        debug!(rows = next.len(), "inserted row");
        self.replace(next);
        Ok(())
    }

    /// Removes the row at `row`, a full-dataset index.
    pub fn delete_row(&mut self, row: usize) -> Result<(), EngineError> {
        let next = self.current()?.without_row(row)?;
        debug!(row, rows = next.len(), "deleted row");
        self.replace(next);
        Ok(())
    }

    fn replace(&mut self, next: Dataset) {
        self.dataset = Some(next);
        self.dirty = true;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
