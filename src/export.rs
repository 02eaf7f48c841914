//! CSV snapshot of the whole catalog.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::db::Catalog;
use crate::error::{CatalogError, Result};

/// Column labels written as the first row. The Indonesian labels are kept
/// as-is so spreadsheets built on earlier exports keep working.
pub const CSV_HEADER: [&str; 4] = ["ID", "Judul", "Pengarang", "Tahun"];

/// File name used when the caller does not choose a destination.
pub const DEFAULT_EXPORT_FILE: &str = "books_export.csv";

/// What an export produced, for the shell to report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Write every book to `destination`, replacing any existing file.
pub fn export_all(catalog: &Catalog, destination: impl AsRef<Path>) -> Result<ExportSummary> {
    let destination = destination.as_ref();
    let books = catalog.list("")?;

    let file = File::create(destination).map_err(|err| CatalogError::io(destination, err))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CSV_HEADER)?;
    for book in &books {
        writer.write_record([
            book.id.to_string(),
            book.title.clone(),
            book.author.clone(),
            book.year.to_string(),
        ])?;
    }

    writer
        .flush()
        .map_err(|err| CatalogError::io(destination, err))?;

    info!(path = %destination.display(), rows = books.len(), "exported catalog");
    Ok(ExportSummary {
        path: destination.to_path_buf(),
        rows: books.len(),
    })
}
