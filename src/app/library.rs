//! Book list view: search, category filter, ordering and selection

use std::cmp::Ordering;

use crate::app::form::{insert_at, next_boundary, prev_boundary, remove_before};
use crate::app::notice::Notice;
use crate::constants::{EMPTY_COLLECTION, NO_MATCHES};
use crate::models::{BookRecord, Category};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Categories",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Year,
}

impl SortKey {
    pub fn next(&self) -> SortKey {
        match self {
            SortKey::None => SortKey::Title,
            SortKey::Title => SortKey::Author,
            SortKey::Author => SortKey::Year,
            SortKey::Year => SortKey::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::None => "Order By...",
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::Year => "Year",
        }
    }
}

/// Records whose title or author contains `search` (case-insensitive) and
/// whose category passes `filter`, in fetch order
pub fn filter_books<'a>(
    books: &'a [BookRecord],
    search: &str,
    filter: CategoryFilter,
) -> Vec<&'a BookRecord> {
    let needle = search.to_lowercase();
    books
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
        })
        .filter(|book| filter.matches(book.category))
        .collect()
}

/// Stable in-place ordering; `SortKey::None` leaves fetch order alone
pub fn sort_books(books: &mut [&BookRecord], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::Title => books.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
        SortKey::Author => books.sort_by(|a, b| locale_cmp(&a.author, &b.author)),
        SortKey::Year => books.sort_by_key(|book| book.year),
    }
}

/// Case-folded comparison; on a tie lowercase sorts before uppercase
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// The signed-in user's collection as shown on the library screen
#[derive(Clone, Debug, Default)]
pub struct Library {
    pub books: Vec<BookRecord>,
    pub loading: bool,
    pub search: String,
    pub search_cursor: usize,
    pub filter: CategoryFilter,
    pub sort: SortKey,
    pub selected: usize,
    /// Request id of the list fetch in flight
    pub pending_load: Option<u64>,
    /// Book awaiting delete confirmation
    pub pending_delete: Option<String>,
    /// Request id of the delete in flight
    pub pending_mutation: Option<u64>,
    pub success: Notice,
    pub error: Notice,
}

impl Library {
    pub fn visible(&self) -> Vec<&BookRecord> {
        let mut books = filter_books(&self.books, &self.search, self.filter);
        sort_books(&mut books, self.sort);
        books
    }

    /// Distinct categories of the fetched books, first-seen order
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for book in &self.books {
            if !seen.contains(&book.category) {
                seen.push(book.category);
            }
        }
        seen
    }

    /// Message for an empty view; `None` when something is listed
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.books.is_empty() {
            Some(EMPTY_COLLECTION)
        } else if self.visible().is_empty() {
            Some(NO_MATCHES)
        } else {
            None
        }
    }

    pub fn selected_book(&self) -> Option<&BookRecord> {
        self.visible().get(self.selected).copied()
    }

    /// Swap in a freshly fetched list
    pub fn replace(&mut self, books: Vec<BookRecord>) {
        self.books = books;
        self.loading = false;
        self.pending_load = None;
        if let CategoryFilter::Only(category) = self.filter {
            if !self.books.iter().any(|b| b.category == category) {
                self.filter = CategoryFilter::All;
            }
        }
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        let mut options = vec![CategoryFilter::All];
        options.extend(self.categories().into_iter().map(CategoryFilter::Only));

        let current = options.iter().position(|f| *f == self.filter).unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.filter = options[next];
        self.selected = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    // Search box editing

    pub fn search_char(&mut self, c: char) {
        insert_at(&mut self.search, &mut self.search_cursor, c);
        self.clamp_selection();
    }

    pub fn search_backspace(&mut self) {
        remove_before(&mut self.search, &mut self.search_cursor);
        self.clamp_selection();
    }

    pub fn search_cursor_left(&mut self) {
        self.search_cursor = prev_boundary(&self.search, self.search_cursor);
    }

    pub fn search_cursor_right(&mut self) {
        self.search_cursor = next_boundary(&self.search, self.search_cursor);
    }
}
