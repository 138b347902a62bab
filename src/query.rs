//! Query engine - the filter, sort and paginate pipeline over the record cache
//!
//! `run_query` is pure: it reads the full record set and the view state and
//! returns the visible slice. It is re-run in full after every state change.

use std::cmp::Ordering;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::models::Product;

/// Sortable column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Price,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Price => "price",
        }
    }
}

/// Sort direction, acting as a +1 / -1 multiplier on the comparator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Ascending,
    Descending,
}

impl SortDir {
    pub fn flip(self) -> SortDir {
        match self {
            SortDir::Ascending => SortDir::Descending,
            SortDir::Descending => SortDir::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDir::Ascending => "▲",
            SortDir::Descending => "▼",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDir::Ascending => ordering,
            SortDir::Descending => ordering.reverse(),
        }
    }
}

/// What subset of the records is currently visible
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    /// 1-based page cursor
    pub page: usize,
    pub page_size: usize,
    /// Lowercased, trimmed search term; empty means no filter
    pub search: String,
    pub sort_by: Option<SortKey>,
    pub sort_dir: SortDir,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        ViewState {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            sort_by: None,
            sort_dir: SortDir::Ascending,
        }
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    /// Same key flips the direction; a new key starts ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_by == Some(key) {
            self.sort_dir = self.sort_dir.flip();
        } else {
            self.sort_by = Some(key);
            self.sort_dir = SortDir::Ascending;
        }
        self.page = 1;
    }

    /// Plain navigation; the query engine clamps out-of-range pages
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn next_page(&mut self, page_count: usize) {
        if self.page < page_count {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn clamp_to(&mut self, page_count: usize) {
        self.page = self.page.clamp(1, page_count.max(1));
    }
}

/// Output of one pass of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    pub rows: Vec<&'a Product>,
    /// Page actually shown, after clamping
    pub page: usize,
    pub page_count: usize,
    /// Records matching the search, across all pages
    pub total_matches: usize,
}

/// Number of pages needed for `count` records, never less than one
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Filter, sort and paginate `products` according to `view`
pub fn run_query<'a>(products: &'a [Product], view: &ViewState) -> QueryResult<'a> {
    let needle = view.search.to_lowercase();
    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
        .collect();

    if let Some(key) = view.sort_by {
        // sort_by is stable, so ties keep their original relative order
        matches.sort_by(|a, b| view.sort_dir.apply(compare(a, b, key)));
    }

    let page_size = view.page_size.max(1);
    let total_matches = matches.len();
    let pages = page_count(total_matches, page_size);
    let page = view.page.clamp(1, pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_matches);
    let rows = if start < end {
        matches[start..end].to_vec()
    } else {
        Vec::new()
    };

    QueryResult {
        rows,
        page,
        page_count: pages,
        total_matches,
    }
}

fn compare(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Price => a.price.total_cmp(&b.price),
    }
}
