use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::usecase::ports::error::EngineError;
use crate::usecase::ports::export::{ExportPayload, ExportSink};

/// Writes exports into a directory, or to one exact path when chosen by the user.
#[derive(Debug, Clone)]
pub enum FileSink {
    Directory(PathBuf),
    Path(PathBuf),
}

impl FileSink {
    fn target(&self, payload: &ExportPayload) -> PathBuf {
        match self {
            FileSink::Directory(dir) => dir.join(&payload.file_name),
            FileSink::Path(path) => path.clone(),
        }
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(())
}

impl ExportSink for FileSink {
    fn write(&self, payload: &ExportPayload) -> Result<PathBuf, EngineError> {
        let path = self.target(payload);
        write_bytes(&path, &payload.bytes).map_err(|err| EngineError::Export(format!("{err:#}")))?;
        Ok(path)
    }
}
