use crate::models::Book;

/// Rows currently shown in the table plus the cursor and the active search.
/// The rows always come straight from `Catalog::list` with `filter`.
#[derive(Default)]
pub(crate) struct BookListScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) filter: String,
    pub(crate) selected: usize,
}

impl BookListScreen {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        Self {
            books,
            filter: String::new(),
            selected: 0,
        }
    }

    /// Replace the rows after a reload, keeping the cursor on `focus_id` when
    /// it is still visible.
    pub(crate) fn set_books(&mut self, books: Vec<Book>, focus_id: Option<i64>) {
        self.books = books;
        if let Some(id) = focus_id {
            if let Some(idx) = self.books.iter().position(|b| b.id == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    /// Search text as sent to the store: surrounding whitespace is ignored.
    pub(crate) fn query(&self) -> &str {
        self.filter.trim()
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let last = self.books.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.selected >= self.books.len() {
            self.selected = self.books.len().saturating_sub(1);
        }
    }
}
