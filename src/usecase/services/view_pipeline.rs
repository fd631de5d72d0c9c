//! Derives the displayed page from a dataset snapshot and a [`ViewState`].
//!
//! Stages run in a fixed order: search, column filters, sort, grouping,
//! pagination. Every stage works on full-dataset row indices so that a
//! displayed row can always be traced back to the row it came from.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use feruca::Collator;
use tracing::trace;

use crate::domain::entities::cell::{row_text, CellValue, Row};
use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::view::{SortDirection, SortSpec, ViewState};

pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEntry {
    /// Display-only marker placed before each run of rows sharing `key`.
    Group { key: String, count: usize },
    Row { source: usize, row: Arc<Row> },
}

impl ViewEntry {
    pub fn source(&self) -> Option<usize> {
        match self {
            ViewEntry::Row { source, .. } => Some(*source),
            ViewEntry::Group { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub entries: Vec<ViewEntry>,
    /// Length of the filtered (and grouped, headers included) sequence.
    pub total_entries: usize,
    pub matched_rows: usize,
    pub total_rows: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub sort: Option<SortSpec>,
    pub filter_choices: BTreeMap<String, Vec<String>>,
}

impl PageView {
    pub fn offset(&self) -> usize {
        self.page * self.page_size
    }
}

pub fn derive_view(dataset: &Dataset, state: &ViewState) -> PageView {
    let mut indices = search_filter(dataset, &state.search);
    indices = column_filter(dataset, indices, &state.filters);
    let matched_rows = indices.len();
    sort_rows(dataset, &mut indices, state.sort.as_ref());

    let entries = match state.active_group() {
        Some(group_by) => group_rows(dataset, &indices, group_by),
        None => row_entries(dataset, &indices),
    };

    let page_size = state.page_size.max(1);
    let page = clamp_page(state.page, entries.len(), page_size);
    let page_entries = paginate(&entries, page, page_size);
    trace!(
        matched_rows,
        total_entries = entries.len(),
        page,
        "derived table view"
    );

    PageView {
        entries: page_entries,
        total_entries: entries.len(),
        matched_rows,
        total_rows: dataset.len(),
        page,
        page_count: page_count(entries.len(), page_size),
        page_size,
        sort: state.sort.clone(),
        filter_choices: filter_choices(dataset),
    }
}

/// Indices of rows where any value contains `search`, ignoring case.
pub fn search_filter(dataset: &Dataset, search: &str) -> Vec<usize> {
    if search.is_empty() {
        return (0..dataset.len()).collect();
    }
    let needle = search.to_lowercase();
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.values()
                .any(|value| value.display().to_lowercase().contains(&needle))
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Keeps rows whose cell contains the filter text for every active filter.
pub fn column_filter(
    dataset: &Dataset,
    indices: Vec<usize>,
    filters: &BTreeMap<String, String>,
) -> Vec<usize> {
    let active: Vec<(&str, String)> = filters
        .iter()
        .filter(|(_, term)| !term.is_empty())
        .map(|(column, term)| (column.as_str(), term.to_lowercase()))
        .collect();
    if active.is_empty() {
        return indices;
    }

    indices
        .into_iter()
        .filter(|&idx| {
            dataset.row(idx).is_some_and(|row| {
                active
                    .iter()
                    .all(|(column, term)| row_text(row, column).to_lowercase().contains(term))
            })
        })
        .collect()
}

/// Unicode collation with the root locale: accents and case only break
/// ties, so `éclair` sorts between `apple` and `zebra` and `a` before `A`.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    Collator::default().collate(left, right)
}

/// Stable sort on the display string of the sort column.
pub fn sort_rows(dataset: &Dataset, indices: &mut Vec<usize>, sort: Option<&SortSpec>) {
    let Some(sort) = sort else {
        return;
    };

    let mut keyed: Vec<(usize, String)> = indices
        .iter()
        .map(|&idx| {
            let key = dataset
                .row(idx)
                .map(|row| row_text(row, &sort.column))
                .unwrap_or_default();
            (idx, key)
        })
        .collect();

    let mut collator = Collator::default();
    match sort.direction {
        SortDirection::Asc => keyed.sort_by(|a, b| collator.collate(&a.1, &b.1)),
        SortDirection::Desc => keyed.sort_by(|a, b| collator.collate(&b.1, &a.1)),
    }

    *indices = keyed.into_iter().map(|(idx, _)| idx).collect();
}

fn row_entries(dataset: &Dataset, indices: &[usize]) -> Vec<ViewEntry> {
    indices
        .iter()
        .filter_map(|&source| {
            dataset.rows().get(source).map(|row| ViewEntry::Row {
                source,
                row: Arc::clone(row),
            })
        })
        .collect()
}

pub fn group_key(row: &Row, group_by: &str) -> String {
    let key = row_text(row, group_by);
    if key.is_empty() {
        UNKNOWN_GROUP.to_string()
    } else {
        key
    }
}

/// Splits the sequence into contiguous runs of equal group key, each led by
/// a header. Rows are not reordered: when the input is not sorted by the
/// group column the same key can head several runs.
pub fn group_rows(dataset: &Dataset, indices: &[usize], group_by: &str) -> Vec<ViewEntry> {
    let mut entries = Vec::with_capacity(indices.len() + 1);
    let mut current_key: Option<String> = None;
    let mut header_pos = 0;

    for &source in indices {
        let Some(row) = dataset.rows().get(source) else {
            continue;
        };
        let key = group_key(row, group_by);
        if current_key.as_deref() != Some(key.as_str()) {
            header_pos = entries.len();
            entries.push(ViewEntry::Group {
                key: key.clone(),
                count: 0,
            });
            current_key = Some(key);
        }
        if let Some(ViewEntry::Group { count, .. }) = entries.get_mut(header_pos) {
            *count += 1;
        }
        entries.push(ViewEntry::Row {
            source,
            row: Arc::clone(row),
        });
    }

    entries
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Largest valid page not past `page`; 0 when there is nothing to show.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.min(page_count(len, page_size) - 1)
}

pub fn paginate<T: Clone>(entries: &[T], page: usize, page_size: usize) -> Vec<T> {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size);
    if start >= entries.len() {
        return Vec::new();
    }
    let end = (start + page_size).min(entries.len());
    entries[start..end].to_vec()
}

/// Sorted distinct non-empty trimmed values per column over the whole dataset.
pub fn filter_choices(dataset: &Dataset) -> BTreeMap<String, Vec<String>> {
    dataset
        .columns()
        .iter()
        .map(|column| {
            let values: BTreeSet<String> = dataset
                .rows()
                .iter()
                .filter_map(|row| row.get(column).map(CellValue::display))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect();
            (column.clone(), values.into_iter().collect())
        })
        .collect()
}
