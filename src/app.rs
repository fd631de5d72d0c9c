use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;
use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::entities::cell::{row_text, Row};
use crate::domain::entities::edit::EditingCursor;
use crate::domain::entities::view::{ViewState, PAGE_SIZE_CHOICES};
use crate::infra::export::delimited::{export_file_name, ExportFormat};
use crate::infra::export::file::FileSink;
use crate::platform::desktop::paths::default_export_dir;
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::error::{EngineError, NoticeLevel};
use crate::usecase::ports::parser::ParsedTable;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::session::EditorSession;
use crate::usecase::services::view_pipeline::{PageView, ViewEntry};

const CELL_STYLE: &str = "border: 1px solid #bbb; padding: 4px 6px; white-space: pre-wrap;";
const HEADER_STYLE: &str = "border: 1px solid #bbb; padding: 6px; background: #f3f3f3; position: sticky; top: 0; cursor: pointer; text-align: left;";
const NONE_OPTION_VALUE: &str = "";

/// Runs `action` against the session and surfaces its error as the notice.
fn apply<F>(mut session: Signal<EditorSession>, action: F)
where
    F: FnOnce(&mut EditorSession) -> Result<(), EngineError>,
{
    let mut guard = session.write();
    if let Err(err) = action(&mut *guard) {
        guard.report(&err);
    }
}

fn confirm_replace(session: Signal<EditorSession>) -> bool {
    if !session.read().has_unsaved_changes() {
        return true;
    }
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Unsaved changes")
        .set_description("Discard unsaved changes and load another table?")
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

fn load_table(session: Signal<EditorSession>, result: Result<ParsedTable, EngineError>) {
    match result {
        Ok(table) => apply(session, |state| state.load(table)),
        Err(err) => apply(session, |_| Err(err)),
    }
}

fn open_file(session: Signal<EditorSession>, importer: &ImportService) {
    if !confirm_replace(session) {
        return;
    }
    let Some(path) = FileDialog::new()
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("All files", &["*"])
        .pick_file()
    else {
        return;
    };
    load_table(session, importer.import_file(&path));
}

fn load_example(session: Signal<EditorSession>, importer: &ImportService) {
    if !confirm_replace(session) {
        return;
    }
    load_table(session, importer.import_example());
}

fn save_table(mut session: Signal<EditorSession>) {
    if session.read().dataset().is_some_and(|dataset| dataset.is_empty()) {
        session.write().report(&EngineError::EmptySave);
        return;
    }

    let today = Local::now().date_naive();
    let delimiter = session.read().config().delimiter;
    let file_name = export_file_name(ExportFormat::for_delimiter(delimiter), today);
    let mut dialog = FileDialog::new().set_file_name(file_name.as_str());
    if let Ok(dir) = default_export_dir() {
        dialog = dialog.set_directory(dir);
    }
    let Some(path) = dialog.save_file() else {
        return;
    };

    let exporter = ExportService::new(Arc::new(FileSink::Path(path)));
    let result = exporter.save(&mut session.write(), today);
    if let Ok(path) = result {
        info!(path = %path.display(), "save completed");
    }
}

fn sort_arrow(view: &ViewState, column: &str) -> &'static str {
    match &view.sort {
        Some(sort) if sort.column == column => sort.direction.arrow(),
        _ => "",
    }
}

fn render_header(session: Signal<EditorSession>, columns: &[String], view: &ViewState) -> Element {
    rsx! {
        tr {
            {columns.iter().map(|column| {
                let arrow = sort_arrow(view, column);
                let label = column.clone();
                let column = column.clone();
                let mut session = session;
                rsx!(
                    th {
                        key: "{label}",
                        style: HEADER_STYLE,
                        onclick: move |_| session.write().toggle_sort(&column),
                        "{label} {arrow}"
                    }
                )
            })}
            th { style: HEADER_STYLE, "" }
        }
    }
}

fn render_filters(
    session: Signal<EditorSession>,
    columns: &[String],
    view: &ViewState,
    choices: &BTreeMap<String, Vec<String>>,
) -> Element {
    rsx! {
        tr {
            {columns.iter().map(|column| {
                let selected = view.filters.get(column).cloned().unwrap_or_default();
                let options = choices.get(column).cloned().unwrap_or_default();
                let label = column.clone();
                let column = column.clone();
                let mut session = session;
                rsx!(
                    th {
                        key: "{label}",
                        style: "border: 1px solid #bbb; padding: 4px; background: #fafafa;",
                        select {
                            style: "width: 100%;",
                            value: "{selected}",
                            onchange: move |event| session.write().set_filter(&column, event.value()),
                            option { value: NONE_OPTION_VALUE, "(all)" }
                            {options.into_iter().map(|choice| rsx!(
                                option { key: "{choice}", value: "{choice}", selected: choice == selected, "{choice}" }
                            ))}
                        }
                    }
                )
            })}
            th { style: "border: 1px solid #bbb; background: #fafafa;", "" }
        }
    }
}

fn render_cell(
    session: Signal<EditorSession>,
    source: usize,
    row: &Row,
    column: &str,
    cursor: Option<&EditingCursor>,
) -> Element {
    let column = column.to_string();
    let cell_key = format!("{source}-{column}");
    let mut session = session;

    if let Some(cursor) = cursor.filter(|cursor| cursor.is_at(source, &column)) {
        let value = cursor.value.clone();
        return rsx! {
            td {
                key: "{cell_key}",
                style: CELL_STYLE,
                input {
                    style: "width: 100%;",
                    autofocus: true,
                    value: "{value}",
                    oninput: move |event| session.write().update_edit(event.value()),
                    onkeydown: move |event| {
                        if event.key() == Key::Enter {
                            apply(session, EditorSession::commit_edit);
                        } else if event.key() == Key::Escape {
                            session.write().cancel_edit();
                        }
                    },
                    onblur: move |_| apply(session, EditorSession::blur_edit),
                }
            }
        };
    }

    let text = row_text(row, &column);
    rsx! {
        td {
            key: "{cell_key}",
            style: CELL_STYLE,
            ondoubleclick: move |_| apply(session, |state| state.begin_edit(source, &column)),
            "{text}"
        }
    }
}

fn render_body(
    session: Signal<EditorSession>,
    columns: &[String],
    page: &PageView,
    cursor: Option<&EditingCursor>,
) -> Element {
    let span = columns.len() + 1;
    let snapshot = session.read().clone();

    rsx! {
        {page.entries.iter().enumerate().map(|(position, entry)| match entry {
            ViewEntry::Group { key, count } => rsx!(
                tr {
                    key: "group-{position}",
                    td {
                        colspan: "{span}",
                        style: "border: 1px solid #bbb; padding: 6px; background: #e8ecf4; font-weight: 600;",
                        "{key} ({count})"
                    }
                }
            ),
            ViewEntry::Row { source, row } => {
                let source = *source;
                let background = snapshot
                    .highlight_for(entry)
                    .map(|color| color.css())
                    .unwrap_or_else(|| "transparent".to_string());
                rsx!(
                    tr {
                        key: "row-{source}",
                        style: "background: {background};",
                        {columns.iter().map(|column| render_cell(session, source, row, column, cursor))}
                        td { style: CELL_STYLE,
                            button {
                                onclick: move |_| apply(session, |state| state.delete_displayed(position).map(|_| ())),
                                "Delete"
                            }
                        }
                    }
                )
            }
        })}
    }
}

#[component]
pub fn App() -> Element {
    let config = use_hook(AppConfig::from_env);
    let AppState {
        mut session,
        mut show_filters,
    } = AppState::new(config);
    let importer = use_hook(move || Arc::new(ImportService::new(Arc::new(config.parser()))));
    let importer_for_open = importer.clone();
    let importer_for_example = importer.clone();

    let snapshot = session.read().clone();
    let loaded = snapshot.is_loaded();
    let columns = snapshot.columns().to_vec();
    let view = snapshot.view_state().clone();
    let cursor = snapshot.cursor().cloned();
    let page = snapshot.page_view();
    let save_label = if snapshot.has_unsaved_changes() { "Save *" } else { "Save" };
    let (notice_color, notice_text) = match snapshot.notice() {
        Some(notice) => (
            match notice.level {
                NoticeLevel::Info => "#2d5a2d",
                NoticeLevel::Warning => "#8a5a00",
                NoticeLevel::Error => "#b00020",
            },
            notice.message.clone(),
        ),
        None => ("#333", "Ready".to_string()),
    };
    let search = view.search.clone();
    let group_value = view.group_by.clone().unwrap_or_default();
    let highlight = view.highlight;
    let group_headers = view.show_group_headers;
    let page_size = view.page_size;

    let table = match &page {
        Some(page) => {
            let (current, pages) = (page.page + 1, page.page_count);
            let first = if page.entries.is_empty() { 0 } else { page.offset() + 1 };
            let last = page.offset() + page.entries.len();
            let (total_entries, matched_rows, total_rows) =
                (page.total_entries, page.matched_rows, page.total_rows);
            let on_first_page = page.page == 0;
            rsx! {
                table {
                    style: "border-collapse: collapse; width: 100%; font-size: 14px;",
                    thead {
                        {render_header(session, &columns, &view)}
                        if show_filters() {
                            {render_filters(session, &columns, &view, &page.filter_choices)}
                        }
                    }
                    tbody {
                        {render_body(session, &columns, page, cursor.as_ref())}
                    }
                }
                div {
                    style: "display: flex; gap: 8px; align-items: center; margin-top: 8px;",
                    button {
                        disabled: on_first_page,
                        onclick: move |_| session.write().prev_page(),
                        "Previous"
                    }
                    span { "Page {current} / {pages}" }
                    button {
                        disabled: current >= pages,
                        onclick: move |_| session.write().next_page(),
                        "Next"
                    }
                    span {
                        "Showing {first}-{last} of {total_entries} · {matched_rows} of {total_rows} rows match"
                    }
                }
            }
        }
        None => rsx! {
            p { style: "color: #666;", "Open a CSV file or load the example to start editing." }
        },
    };

    rsx! {
        div {
            tabindex: "0",
            style: "font-family: sans-serif; padding: 12px; background: #fff; min-height: 100vh; outline: none;",
            onkeydown: move |event| {
                let modifiers = event.modifiers();
                let key = event.key().to_string();
                let shortcut =
                    EditorSession::is_save_shortcut(&key, modifiers.ctrl(), modifiers.meta());
                if shortcut && session.read().can_save_shortcut() {
                    event.prevent_default();
                    save_table(session);
                }
            },

            h2 { "tabedit" }

            div {
                style: "display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-bottom: 12px; position: sticky; top: 0; background: #fff; z-index: 900; padding: 8px 0;",
                button {
                    onclick: move |_| open_file(session, &importer_for_open),
                    "Open file"
                }
                button {
                    onclick: move |_| load_example(session, &importer_for_example),
                    "Load example"
                }
                button {
                    disabled: !loaded,
                    onclick: move |_| apply(session, EditorSession::insert_row),
                    "Insert row"
                }
                button {
                    disabled: !loaded,
                    onclick: move |_| save_table(session),
                    "{save_label}"
                }
                input {
                    placeholder: "Search all columns",
                    disabled: !loaded,
                    value: "{search}",
                    oninput: move |event| session.write().set_search(event.value()),
                }
                label { "Group by "
                    select {
                        disabled: !loaded,
                        value: "{group_value}",
                        onchange: move |event| {
                            let value = event.value();
                            session
                                .write()
                                .set_group_by(if value.is_empty() { None } else { Some(value) });
                        },
                        option { value: NONE_OPTION_VALUE, "(none)" }
                        {columns.iter().map(|column| rsx!(
                            option {
                                key: "{column}",
                                value: "{column}",
                                selected: *column == group_value,
                                "{column}"
                            }
                        ))}
                    }
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: highlight,
                        onclick: move |_| session.write().set_highlight(!highlight),
                    }
                    " Highlight groups"
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: group_headers,
                        onclick: move |_| session.write().set_show_group_headers(!group_headers),
                    }
                    " Group headers"
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: show_filters(),
                        onclick: move |_| {
                            let next = !show_filters();
                            show_filters.set(next);
                        },
                    }
                    " Column filters"
                }
                label { "Rows per page "
                    select {
                        value: "{page_size}",
                        onchange: move |event| {
                            if let Ok(size) = event.value().parse::<usize>() {
                                session.write().set_page_size(size);
                            }
                        },
                        {PAGE_SIZE_CHOICES.iter().map(|choice| rsx!(
                            option {
                                key: "{choice}",
                                value: "{choice}",
                                selected: *choice == page_size,
                                "{choice}"
                            }
                        ))}
                    }
                }
            }

            p { style: "color: {notice_color}; margin: 4px 0 12px;", "{notice_text}" }

            {table}
        }
    }
}
