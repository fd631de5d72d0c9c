/// The cell currently in text-edit mode.
///
/// `row` addresses the full dataset, never a position in the filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingCursor {
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl EditingCursor {
    pub fn is_at(&self, row: usize, column: &str) -> bool {
        self.row == row && self.column == column
    }
}
