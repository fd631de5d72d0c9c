use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::infra::import::csv::read_text_file;
use crate::usecase::ports::error::EngineError;
use crate::usecase::ports::parser::{ParsedTable, TableParser};

pub const EXAMPLE_CSV: &str = include_str!("../../../assets/example.csv");

pub struct ImportService {
    parser: Arc<dyn TableParser>,
}

impl ImportService {
    pub fn new(parser: Arc<dyn TableParser>) -> Self {
        Self { parser }
    }

    /// Parses `text`, rejecting tables without columns or rows.
    pub fn import_text(&self, text: &str) -> Result<ParsedTable, EngineError> {
        let table = self.parser.parse(text).inspect_err(|err| {
            warn!(%err, "parse failed");
        })?;
        if table.columns.is_empty() || table.rows.is_empty() {
            warn!(
                columns = table.columns.len(),
                rows = table.rows.len(),
                "parsed table has no usable data"
            );
            return Err(EngineError::NoUsableData);
        }
        Ok(table)
    }

    pub fn import_file(&self, path: &Path) -> Result<ParsedTable, EngineError> {
        info!(path = %path.display(), "importing file");
        let text = read_text_file(path).map_err(|err| EngineError::Parse(format!("{err:#}")))?;
        self.import_text(&text)
    }

    pub fn import_example(&self) -> Result<ParsedTable, EngineError> {
        info!("importing bundled example");
        self.import_text(EXAMPLE_CSV)
    }
}
