use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::data::column::ColumnDescriptor;
use crate::data::record::Record;
use crate::data::value_compare::compare_optional_values;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PLACEHOLDER: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current sort key and direction. `key == None` means source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }
}

/// Sort marker shown next to a sortable header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn glyph(self) -> &'static str {
        match self {
            SortIndicator::Unsorted => "↕",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    /// `None` for columns that cannot be sorted
    pub indicator: Option<SortIndicator>,
}

/// The "Showing X to Y of Z results" line under a paginated table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} results",
            self.first, self.last, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    Rows(Vec<Vec<String>>),
    /// Single row spanning every column
    Placeholder { text: String, colspan: usize },
}

/// Pagination controls state; only present when there is more than one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub summary: PageSummary,
}

/// Fully rendered page, ready for a text or document front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub headers: Vec<HeaderCell>,
    pub body: PageBody,
    pub pagination: Option<PaginationControls>,
}

impl RenderedPage {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, PageBody::Placeholder { .. })
    }
}

/// Result of deriving the view: the visible slice plus page metadata
#[derive(Debug, Clone)]
pub struct ViewSnapshot<'a> {
    pub page: Vec<&'a Record>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total_rows: usize,
    pub sort: SortState,
}

/// A sorted, paginated view over a shared record collection.
///
/// The collection is never copied or mutated; the view keeps row indices
/// into it. Sort and page state survive `set_data`, but the page is
/// clamped to the new page count.
#[derive(Clone)]
pub struct TableView {
    /// The underlying immutable data source
    source: Arc<Vec<Record>>,

    columns: Vec<ColumnDescriptor>,

    /// Source indices in display order
    sorted_rows: Vec<usize>,

    sort: SortState,
    page_size: usize,
    current_page: usize,
    placeholder: String,
}

impl TableView {
    pub fn new(source: Arc<Vec<Record>>, columns: Vec<ColumnDescriptor>) -> Self {
        let mut view = Self {
            sorted_rows: (0..source.len()).collect(),
            source,
            columns,
            sort: SortState::default(),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        };
        view.clamp_page();
        view
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Replace the input collection (e.g. after a filter change)
    pub fn set_data(&mut self, source: Arc<Vec<Record>>) {
        self.source = source;
        self.resort();
        self.clamp_page();
        debug!(
            "TableView data replaced: {} rows, page {}/{}",
            self.source.len(),
            self.current_page,
            self.total_pages()
        );
    }

    /// Change the page size; zero is treated as one
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp_page();
    }

    /// Sort by `key`. Re-selecting the current key flips the direction,
    /// a new key starts ascending. Unknown or unsortable columns are
    /// ignored and `false` is returned.
    pub fn set_sort(&mut self, key: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == key && c.sortable);
        if !sortable {
            warn!("Ignoring sort request for column '{}'", key);
            return false;
        }

        if self.sort.key.as_deref() == Some(key) {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort.key = Some(key.to_string());
            self.sort.direction = SortDirection::Ascending;
        }
        self.resort();
        debug!("TableView sorted by {} {:?}", key, self.sort.direction);
        true
    }

    /// Return to source order
    pub fn clear_sort(&mut self) {
        self.sort = SortState::default();
        self.resort();
    }

    /// Jump to page `page`, clamped to `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn total_pages(&self) -> usize {
        self.sorted_rows.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_rows(&self) -> usize {
        self.sorted_rows.len()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn source(&self) -> &Arc<Vec<Record>> {
        &self.source
    }

    /// Pagination controls are only shown for more than one page
    pub fn show_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    /// Page numbers for the pagination buttons
    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages()
    }

    /// Records on the current page, in display order
    pub fn page_records(&self) -> Vec<&Record> {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.sorted_rows.len());
        if start >= end {
            return Vec::new();
        }
        self.sorted_rows[start..end]
            .iter()
            .map(|&idx| &self.source[idx])
            .collect()
    }

    /// Every record in display order, ignoring pagination
    pub fn sorted_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.sorted_rows.iter().map(move |&idx| &self.source[idx])
    }

    pub fn summary(&self) -> Option<PageSummary> {
        let total = self.sorted_rows.len();
        if total == 0 {
            return None;
        }
        let first = (self.current_page - 1) * self.page_size + 1;
        let last = (first - 1 + self.page_size).min(total);
        Some(PageSummary { first, last, total })
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            page: self.page_records(),
            total_pages: self.total_pages(),
            current_page: self.current_page,
            total_rows: self.total_rows(),
            sort: self.sort.clone(),
        }
    }

    pub fn render_page(&self) -> RenderedPage {
        let headers = self
            .columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                indicator: column.sortable.then(|| self.indicator_for(&column.key)),
            })
            .collect();

        let records = self.page_records();
        let body = if records.is_empty() {
            PageBody::Placeholder {
                text: self.placeholder.clone(),
                colspan: self.columns.len(),
            }
        } else {
            PageBody::Rows(
                records
                    .into_iter()
                    .map(|record| self.columns.iter().map(|c| c.display(record)).collect())
                    .collect(),
            )
        };

        let pagination = match (self.show_pagination(), self.summary()) {
            (true, Some(summary)) => Some(PaginationControls {
                current_page: self.current_page,
                total_pages: self.total_pages(),
                has_previous: self.has_previous_page(),
                has_next: self.has_next_page(),
                summary,
            }),
            _ => None,
        };

        RenderedPage {
            headers,
            body,
            pagination,
        }
    }

    fn indicator_for(&self, key: &str) -> SortIndicator {
        if self.sort.key.as_deref() != Some(key) {
            return SortIndicator::Unsorted;
        }
        match self.sort.direction {
            SortDirection::Ascending => SortIndicator::Ascending,
            SortDirection::Descending => SortIndicator::Descending,
        }
    }

    fn resort(&mut self) {
        self.sorted_rows = (0..self.source.len()).collect();

        let Some(key) = self.sort.key.as_deref() else {
            return;
        };
        let source = &self.source;
        let descending = self.sort.direction == SortDirection::Descending;

        // slice::sort_by is stable, and reversing the comparator keeps
        // equal keys in source order in both directions
        self.sorted_rows.sort_by(|&a, &b| {
            let cmp = compare_optional_values(source[a].get(key), source[b].get(key));
            if descending {
                cmp.reverse()
            } else {
                cmp
            }
        });
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        self.current_page = if total == 0 {
            1
        } else {
            self.current_page.clamp(1, total)
        };
    }
}

impl fmt::Debug for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("rows", &self.source.len())
            .field("columns", &self.columns)
            .field("sort", &self.sort)
            .field("page_size", &self.page_size)
            .field("current_page", &self.current_page)
            .finish()
    }
}
