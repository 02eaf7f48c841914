use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// Owned handle to the book store. The shell receives one of these at startup
/// and hands it back to `main` for an explicit [`Catalog::close`].
pub struct Catalog {
    pub(super) conn: Connection,
    path: Option<PathBuf>,
}

impl Catalog {
    /// Open (creating if needed) the database file at `path` and make sure the
    /// schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| CatalogError::io(parent, err))?;
        }

        let conn = Connection::open(path)?;
        let catalog = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        catalog.initialize()?;
        info!(path = %path.display(), "opened catalog");
        Ok(catalog)
    }

    /// Private, non-persistent catalog. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let catalog = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        catalog.initialize()?;
        Ok(catalog)
    }

    /// Create the `books` table if it is missing. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                year INTEGER
            )",
            [],
        )?;
        debug!("books table ready");
        Ok(())
    }

    /// Location of the backing file, `None` for in-memory catalogs.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection. Every write has already been committed, so
    /// this only reports errors SQLite raises while closing.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, err)| CatalogError::Storage(err))?;
        if let Some(path) = path {
            info!(path = %path.display(), "closed catalog");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let catalog = Catalog::open_in_memory().unwrap();
        catalog.initialize().unwrap();
        catalog.initialize().unwrap();
        assert!(catalog.path().is_none());
        catalog.close().unwrap();
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("books.sqlite");

        let catalog = Catalog::open(&db_path).unwrap();
        assert_eq!(catalog.path(), Some(db_path.as_path()));
        catalog.close().unwrap();

        assert!(db_path.exists());
    }
}
