use chrono::NaiveDate;

use crate::domain::entities::cell::{row_text, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn for_delimiter(delimiter: u8) -> Self {
        if delimiter == b'\t' {
            ExportFormat::Tsv
        } else {
            ExportFormat::Csv
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Tsv => "text/tab-separated-values;charset=utf-8",
        }
    }
}

pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "updated_data_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Quotes `value` only when it holds the delimiter, a quote or a line break.
pub fn escape_field(value: &str, delimiter: char) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header line plus one line per row, joined by `\n` with no trailing newline.
pub fn serialize<'a, I>(columns: &[String], rows: I, delimiter: char) -> String
where
    I: IntoIterator<Item = &'a Row>,
{
    let separator = delimiter.to_string();
    let header = columns
        .iter()
        .map(|column| escape_field(column, delimiter))
        .collect::<Vec<_>>()
        .join(&separator);

    let mut lines = vec![header];
    lines.extend(rows.into_iter().map(|row| {
        let line = columns
            .iter()
            .map(|column| escape_field(&row_text(row, column), delimiter))
            .collect::<Vec<_>>()
            .join(&separator);
        // A bare empty line would be skipped by readers as a blank record.
        if line.is_empty() {
            "\"\"".to_string()
        } else {
            line
        }
    }));
    lines.join("\n")
}
