use crate::domain::entities::cell::Row;
use crate::usecase::ports::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

pub trait TableParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedTable, EngineError>;
}
