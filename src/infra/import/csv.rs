use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use crate::domain::entities::cell::{CellValue, Row};
use crate::usecase::ports::error::EngineError;
use crate::usecase::ports::parser::{ParsedTable, TableParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvParser {
    pub delimiter: u8,
    pub dynamic_typing: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            dynamic_typing: false,
        }
    }
}

impl CsvParser {
    pub fn new(delimiter: u8, dynamic_typing: bool) -> Self {
        Self {
            delimiter,
            dynamic_typing,
        }
    }

    fn read(&self, text: &str) -> Result<ParsedTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

        let headers = reader
            .headers()
            .context("failed to read header row")?
            .clone();
        let columns = header_names(&headers);

        let mut rows = Vec::new();
        for (record_idx, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("failed to parse record {}", record_idx + 1))?;
            let row: Row = columns
                .iter()
                .zip(record.iter())
                .map(|(column, field)| (column.clone(), self.cell(field)))
                .collect();
            rows.push(row);
        }

        Ok(ParsedTable { columns, rows })
    }

    fn cell(&self, field: &str) -> CellValue {
        if !self.dynamic_typing {
            return CellValue::from(field);
        }
        match field {
            "true" | "TRUE" | "True" => CellValue::Bool(true),
            "false" | "FALSE" | "False" => CellValue::Bool(false),
            _ => field
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::from(field)),
        }
    }
}

impl TableParser for CsvParser {
    fn parse(&self, text: &str) -> Result<ParsedTable, EngineError> {
        self.read(text)
            .map_err(|err| EngineError::Parse(format!("{err:#}")))
    }
}

/// Unique, non-empty column names: blanks become `column_N`, repeats get
/// `_1`, `_2`, ... appended.
fn header_names(headers: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("column_{}", idx + 1)
            } else {
                name.to_string()
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}
