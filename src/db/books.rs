use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::models::{Book, BookDraft};

use super::Catalog;

/// Map a `SELECT id, title, author, year` row. Rows written by older tools may
/// carry a NULL year, which reads back as "unspecified".
fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
    })
}

impl Catalog {
    /// Validate raw form text and insert a new book, returning its id.
    pub fn create(&self, title: &str, author: &str, year_text: &str) -> Result<i64> {
        let draft = BookDraft::parse(title, author, year_text)?;
        self.insert(&draft)
    }

    /// Insert an already validated draft.
    pub fn insert(&self, draft: &BookDraft) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO books (title, author, year) VALUES (?1, ?2, ?3)",
            params![draft.title, draft.author, draft.year],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, title = %draft.title, "created book");
        Ok(id)
    }

    /// Every book, or only those whose title contains `filter`.
    ///
    /// Matching is a literal, case-sensitive substring test: `%` and `_` in the
    /// filter have no special meaning.
    pub fn list(&self, filter: &str) -> Result<Vec<Book>> {
        let books = if filter.is_empty() {
            let mut stmt = self
                .conn
                .prepare("SELECT id, title, author, year FROM books ORDER BY id")?;
            let rows = stmt.query_map([], book_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        } else {
            let mut stmt = self.conn.prepare(
                "SELECT id, title, author, year FROM books
                 WHERE instr(title, ?1) > 0
                 ORDER BY id",
            )?;
            let rows = stmt.query_map([filter], book_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        debug!(filter, count = books.len(), "listed books");
        Ok(books)
    }

    /// Look up a single book. Fails with [`CatalogError::NotFound`] when the id
    /// is stale.
    pub fn fetch(&self, id: i64) -> Result<Book> {
        self.conn
            .query_row(
                "SELECT id, title, author, year FROM books WHERE id = ?1",
                [id],
                book_from_row,
            )
            .optional()?
            .ok_or(CatalogError::NotFound { id })
    }

    /// Replace title, author and year of book `id`.
    ///
    /// Returns `false` when no such book exists; that case is not an error.
    pub fn update(&self, id: i64, title: &str, author: &str, year_text: &str) -> Result<bool> {
        let draft = BookDraft::parse(title, author, year_text)?;
        self.replace(id, &draft)
    }

    /// Write an already validated draft over book `id`.
    pub fn replace(&self, id: i64, draft: &BookDraft) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE books SET title = ?1, author = ?2, year = ?3 WHERE id = ?4",
            params![draft.title, draft.author, draft.year, id],
        )?;

        if updated == 0 {
            debug!(id, "update matched no book");
        } else {
            info!(id, title = %draft.title, "updated book");
        }
        Ok(updated > 0)
    }

    /// Remove book `id`. Deleting a missing id succeeds and returns `false`.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1", params![id])?;

        if deleted == 0 {
            debug!(id, "delete matched no book");
        } else {
            info!(id, "deleted book");
        }
        Ok(deleted > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
