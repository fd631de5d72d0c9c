use std::path::PathBuf;

use crate::usecase::ports::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub warnings: Vec<String>,
}

pub trait ExportSink: Send + Sync {
    /// Persists the payload and returns where it landed.
    fn write(&self, payload: &ExportPayload) -> Result<PathBuf, EngineError>;
}
