use std::collections::BTreeMap;
use std::fmt;

/// One scalar cell as produced by the parser.
///
/// Every consumer (search, filters, sort, grouping, highlight, export) goes
/// through [`CellValue::display`] so the string form is computed in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn display(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(text) if text.is_empty())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            // f64's Display already drops the fractional part for integral values
            CellValue::Number(number) => write!(f, "{number}"),
            CellValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

pub type Row = BTreeMap<String, CellValue>;

/// Display string of `column` in `row`; a missing key reads as empty.
pub fn row_text(row: &Row, column: &str) -> String {
    row.get(column).map(CellValue::display).unwrap_or_default()
}

pub fn blank_row(columns: &[String]) -> Row {
    columns
        .iter()
        .map(|column| (column.clone(), CellValue::empty()))
        .collect()
}
