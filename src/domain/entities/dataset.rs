use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::cell::{blank_row, CellValue, Row};
use crate::usecase::ports::error::EngineError;

/// Immutable snapshot of the loaded table.
///
/// Rows are shared behind `Arc`, so every mutation produces a new snapshot
/// that reuses all untouched rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Arc<[String]>,
    rows: Arc<Vec<Arc<Row>>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, EngineError> {
        if columns.is_empty() || rows.is_empty() {
            return Err(EngineError::NoUsableData);
        }
        if let Some(duplicate) = first_duplicate(&columns) {
            return Err(EngineError::Parse(format!(
                "duplicate column name: {duplicate}"
            )));
        }

        Ok(Self {
            columns: columns.into(),
            rows: Arc::new(rows.into_iter().map(Arc::new).collect()),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(|row| row.as_ref())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    fn check_row(&self, index: usize) -> Result<(), EngineError> {
        if index >= self.rows.len() {
            return Err(EngineError::RowOutOfBounds {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    fn with_rows(&self, rows: Vec<Arc<Row>>) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            rows: Arc::new(rows),
        }
    }

    pub fn with_cell(
        &self,
        index: usize,
        column: &str,
        value: CellValue,
    ) -> Result<Self, EngineError> {
        self.check_row(index)?;
        if !self.has_column(column) {
            return Err(EngineError::UnknownColumn(column.to_string()));
        }

        let mut next_row = self.rows[index].as_ref().clone();
        next_row.insert(column.to_string(), value);

        let mut rows = self.rows.as_ref().clone();
        rows[index] = Arc::new(next_row);
        Ok(self.with_rows(rows))
    }

    pub fn with_blank_row_first(&self) -> Self {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(Arc::new(blank_row(&self.columns)));
        rows.extend(self.rows.iter().cloned());
        self.with_rows(rows)
    }

    pub fn without_row(&self, index: usize) -> Result<Self, EngineError> {
        self.check_row(index)?;
        let mut rows = self.rows.as_ref().clone();
        rows.remove(index);
        Ok(self.with_rows(rows))
    }

    #[cfg(test)]
    pub fn shares_row_with(&self, other: &Dataset, index: usize, other_index: usize) -> bool {
        match (self.rows.get(index), other.rows.get(other_index)) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

fn first_duplicate(columns: &[String]) -> Option<String> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .find(|column| !seen.insert(column.as_str()))
        .cloned()
}
