use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::entities::cell::row_text;
use crate::domain::entities::dataset::Dataset;
use crate::infra::export::delimited::{export_file_name, serialize, ExportFormat};
use crate::usecase::ports::error::EngineError;
use crate::usecase::ports::export::{ExportPayload, ExportSink};
use crate::usecase::services::session::EditorSession;

pub fn count_empty_cells(dataset: &Dataset) -> usize {
    dataset
        .rows()
        .iter()
        .map(|row| {
            dataset
                .columns()
                .iter()
                .filter(|column| row_text(row, column).trim().is_empty())
                .count()
        })
        .sum()
}

/// Serializes the dataset for download. Empty cells only produce a warning.
pub fn build_payload(
    dataset: &Dataset,
    delimiter: u8,
    date: NaiveDate,
) -> Result<ExportPayload, EngineError> {
    if dataset.is_empty() {
        return Err(EngineError::EmptySave);
    }

    let format = ExportFormat::for_delimiter(delimiter);
    let text = serialize(
        dataset.columns(),
        dataset.rows().iter().map(|row| row.as_ref()),
        char::from(delimiter),
    );

    let mut warnings = Vec::new();
    let empty_cells = count_empty_cells(dataset);
    if empty_cells > 0 {
        warnings.push(format!("{empty_cells} empty cell(s) were saved as blank"));
    }

    Ok(ExportPayload {
        file_name: export_file_name(format, date),
        mime: format.mime(),
        bytes: text.into_bytes(),
        warnings,
    })
}

pub struct ExportService {
    sink: Arc<dyn ExportSink>,
}

impl ExportService {
    pub fn new(sink: Arc<dyn ExportSink>) -> Self {
        Self { sink }
    }

    /// Runs the whole save pathway against `session`, recording the outcome
    /// as the session's notice.
    pub fn save(&self, session: &mut EditorSession, date: NaiveDate) -> Result<PathBuf, EngineError> {
        if let Err(err) = session.begin_save() {
            session.report(&err);
            return Err(err);
        }
        let result = session.prepare_export(date).and_then(|payload| {
            let path = self.sink.write(&payload)?;
            info!(path = %path.display(), bytes = payload.bytes.len(), "saved table");
            Ok((path, payload.warnings))
        });
        if let Err(err) = &result {
            warn!(%err, "save failed");
        }
        session.finish_save(result)
    }
}
