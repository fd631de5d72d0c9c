use std::collections::BTreeMap;

pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Every knob the view pipeline reads. Passed by value into each derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub filters: BTreeMap<String, String>,
    pub sort: Option<SortSpec>,
    pub group_by: Option<String>,
    pub highlight: bool,
    pub show_group_headers: bool,
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: normalize_page_size(page_size),
            ..Self::default()
        }
    }

    /// Filters whose text is non-empty; the only ones the pipeline applies.
    pub fn active_filters(&self) -> impl Iterator<Item = (&String, &String)> {
        self.filters.iter().filter(|(_, term)| !term.is_empty())
    }

    /// Column to group by, when group headers are shown at all.
    pub fn active_group(&self) -> Option<&str> {
        self.group_by.as_deref().filter(|_| self.show_group_headers)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            group_by: None,
            highlight: false,
            show_group_headers: true,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn is_page_size_choice(page_size: usize) -> bool {
    PAGE_SIZE_CHOICES.contains(&page_size)
}

pub fn normalize_page_size(page_size: usize) -> usize {
    if is_page_size_choice(page_size) {
        page_size
    } else {
        DEFAULT_PAGE_SIZE
    }
}
