use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::entities::cell::row_text;
use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::edit::EditingCursor;
use crate::domain::entities::view::{is_page_size_choice, SortDirection, SortSpec, ViewState};
use crate::usecase::ports::error::{EngineError, Notice};
use crate::usecase::ports::export::ExportPayload;
use crate::usecase::ports::parser::ParsedTable;
use crate::usecase::services::export_service::build_payload;
use crate::usecase::services::highlight::{color_for, HighlightColor};
use crate::usecase::services::record_store::RecordStore;
use crate::usecase::services::view_pipeline::{clamp_page, derive_view, PageView, ViewEntry};

/// One editing session: the record store plus everything the table UI needs
/// to remember between interactions.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: AppConfig,
    store: RecordStore,
    view: ViewState,
    cursor: Option<EditingCursor>,
    notice: Option<Notice>,
    saving: bool,
}

impl EditorSession {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: RecordStore::new(),
            view: ViewState::with_page_size(config.default_page_size),
            cursor: None,
            notice: None,
            saving: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.store.dataset()
    }

    pub fn columns(&self) -> &[String] {
        self.store.columns()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn cursor(&self) -> Option<&EditingCursor> {
        self.cursor.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.has_unsaved_changes()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Reports a failure from outside the engine, e.g. a parse error.
    pub fn report(&mut self, err: &EngineError) {
        warn!(%err, "reported error");
        self.notice = Some(Notice::from(err));
    }

    /// Replaces the dataset and resets the view. A rejected table leaves the
    /// previous dataset and view untouched.
    pub fn load(&mut self, table: ParsedTable) -> Result<(), EngineError> {
        let loaded = self.store.load(table).map(|dataset| dataset.len());
        let rows = match loaded {
            Ok(rows) => rows,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };
        self.view = ViewState::with_page_size(self.config.default_page_size);
        self.cursor = None;
        self.saving = false;
        info!(rows, "session loaded dataset");
        self.notice = Some(Notice::info(format!("Loaded {rows} row(s)")));
        Ok(())
    }

    pub fn page_view(&self) -> Option<PageView> {
        self.store
            .dataset()
            .map(|dataset| derive_view(dataset, &self.view))
    }

    pub fn highlight_for(&self, entry: &ViewEntry) -> Option<HighlightColor> {
        match entry {
            ViewEntry::Row { row, .. } => {
                color_for(row, self.view.group_by.as_deref(), self.view.highlight)
            }
            ViewEntry::Group { .. } => None,
        }
    }

    fn sync_page(&mut self) {
        if let Some(dataset) = self.store.dataset() {
            let total = derive_view(dataset, &ViewState { page: 0, ..self.view.clone() })
                .total_entries;
            self.view.page = clamp_page(self.view.page, total, self.view.page_size);
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.view.search != search {
            self.view.search = search;
            self.view.page = 0;
        }
    }

    /// Sets the filter text for `column`; an empty term clears it.
    pub fn set_filter(&mut self, column: &str, term: impl Into<String>) {
        let term = term.into();
        let current = self.view.filters.get(column).cloned().unwrap_or_default();
        if current == term {
            return;
        }
        if term.is_empty() {
            self.view.filters.remove(column);
        } else {
            self.view.filters.insert(column.to_string(), term);
        }
        self.view.page = 0;
    }

    pub fn clear_filters(&mut self) {
        if self.view.active_filters().next().is_some() {
            self.view.page = 0;
        }
        self.view.filters.clear();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        if self.view.sort != sort {
            self.view.sort = sort;
            self.view.page = 0;
        }
    }

    /// Header click: same column flips direction, another column starts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        let direction = match &self.view.sort {
            Some(sort) if sort.column == column => sort.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.set_sort(Some(SortSpec {
            column: column.to_string(),
            direction,
        }));
    }

    pub fn set_group_by(&mut self, group_by: Option<String>) {
        self.view.group_by = group_by;
        self.sync_page();
    }

    pub fn set_highlight(&mut self, enabled: bool) {
        self.view.highlight = enabled;
    }

    pub fn set_show_group_headers(&mut self, shown: bool) {
        self.view.show_group_headers = shown;
        self.sync_page();
    }

    pub fn set_page(&mut self, page: usize) {
        self.view.page = page;
        self.sync_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.view.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.view.page.saturating_sub(1));
    }

    /// Keeps the current page index and lets clamping pull it back in range.
    pub fn set_page_size(&mut self, page_size: usize) {
        if !is_page_size_choice(page_size) {
            warn!(page_size, "ignoring page size outside the offered choices");
            return;
        }
        self.view.page_size = page_size;
        self.sync_page();
    }

    pub fn edit_cell(&mut self, row: usize, column: &str, value: &str) -> Result<(), EngineError> {
        self.store.edit_cell(row, column, value)?;
        self.sync_page();
        Ok(())
    }

    /// Prepends a blank row, jumps to page 0 and opens its first cell.
    pub fn insert_row(&mut self) -> Result<(), EngineError> {
        self.commit_edit()?;
        self.store.insert_row()?;
        self.view.page = 0;
        self.cursor = self.columns().first().map(|column| EditingCursor {
            row: 0,
            column: column.clone(),
            value: String::new(),
        });
        Ok(())
    }

    /// Deletes by full-dataset index, committing any open edit first.
    pub fn delete_row(&mut self, row: usize) -> Result<(), EngineError> {
        self.commit_edit()?;
        self.store.delete_row(row)?;
        self.cursor = None;
        self.sync_page();
        Ok(())
    }

    /// Deletes the row shown at `position` on the current page.
    pub fn delete_displayed(&mut self, position: usize) -> Result<usize, EngineError> {
        let page = self.page_view().ok_or(EngineError::NoUsableData)?;
        let source = page
            .entries
            .get(position)
            .and_then(ViewEntry::source)
            .ok_or(EngineError::RowOutOfBounds {
                index: position,
                len: page.entries.len(),
            })?;
        debug!(position, source, "resolved displayed row");
        self.delete_row(source)?;
        Ok(source)
    }

    /// Opens `column` of full-dataset row `row` for editing, committing any
    /// cell that was already open.
    pub fn begin_edit(&mut self, row: usize, column: &str) -> Result<(), EngineError> {
        self.commit_edit()?;
        let dataset = self.store.dataset().ok_or(EngineError::NoUsableData)?;
        let record = dataset.row(row).ok_or(EngineError::RowOutOfBounds {
            index: row,
            len: dataset.len(),
        })?;
        if !dataset.has_column(column) {
            return Err(EngineError::UnknownColumn(column.to_string()));
        }
        self.cursor = Some(EditingCursor {
            row,
            column: column.to_string(),
            value: row_text(record, column),
        });
        Ok(())
    }

    pub fn update_edit(&mut self, value: impl Into<String>) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.value = value.into();
        }
    }

    /// Writes the in-progress value back. Unchanged values are not a mutation.
    pub fn commit_edit(&mut self) -> Result<(), EngineError> {
        let Some(cursor) = self.cursor.take() else {
            return Ok(());
        };
        let unchanged = self
            .store
            .dataset()
            .and_then(|dataset| dataset.row(cursor.row))
            .is_some_and(|record| row_text(record, &cursor.column) == cursor.value);
        if unchanged {
            return Ok(());
        }
        self.edit_cell(cursor.row, &cursor.column, &cursor.value)
    }

    pub fn cancel_edit(&mut self) {
        self.cursor = None;
    }

    /// Losing focus without an explicit cancel confirms the edit.
    pub fn blur_edit(&mut self) -> Result<(), EngineError> {
        self.commit_edit()
    }

    pub fn is_save_shortcut(key: &str, ctrl: bool, meta: bool) -> bool {
        (ctrl || meta) && key.eq_ignore_ascii_case("s")
    }

    pub fn can_save_shortcut(&self) -> bool {
        self.is_loaded() && !self.saving
    }

    pub fn begin_save(&mut self) -> Result<(), EngineError> {
        if !self.is_loaded() {
            return Err(EngineError::NoUsableData);
        }
        if self.saving {
            return Err(EngineError::Export("a save is already in progress".to_string()));
        }
        self.saving = true;
        Ok(())
    }

    /// Commits any open edit and serializes the current dataset.
    pub fn prepare_export(&mut self, date: NaiveDate) -> Result<ExportPayload, EngineError> {
        self.commit_edit()?;
        let dataset = self.store.dataset().ok_or(EngineError::NoUsableData)?;
        build_payload(dataset, self.config.delimiter, date)
    }

    /// Ends a save started with [`begin_save`](Self::begin_save). Only a
    /// successful write clears the unsaved-changes flag.
    pub fn finish_save(
        &mut self,
        result: Result<(PathBuf, Vec<String>), EngineError>,
    ) -> Result<PathBuf, EngineError> {
        self.saving = false;
        match result {
            Ok((path, warnings)) => {
                self.store.mark_saved();
                self.notice = Some(if warnings.is_empty() {
                    Notice::info(format!("Saved to {}", path.display()))
                } else {
                    Notice::warning(format!(
                        "Saved to {} ({})",
                        path.display(),
                        warnings.join("; ")
                    ))
                });
                Ok(path)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }
}
