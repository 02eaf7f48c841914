//! Where the catalog keeps its files.
//!
//! Data directory precedence:
//! 1. `BOOK_CATALOG_DATA_DIR` environment variable
//! 2. `~/.book-catalog`
//! 3. `./data` when no home directory can be found

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::export::DEFAULT_EXPORT_FILE;

/// Environment variable that relocates all catalog files.
pub const DATA_DIR_ENV: &str = "BOOK_CATALOG_DATA_DIR";
/// Folder name used beneath the user's home directory.
const DATA_DIR_NAME: &str = ".book-catalog";
/// SQLite file name stored inside the data directory.
const DB_FILE_NAME: &str = "books.sqlite";
const LOG_DIR_NAME: &str = "logs";
const FALLBACK_DATA_DIR: &str = "./data";

/// Resolved file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub export_path: PathBuf,
}

impl Config {
    /// Resolve locations from the environment, letting `db_override` (the
    /// `--db` flag) replace the database file.
    pub fn load(db_override: Option<PathBuf>) -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let mut config = Self::in_dir(&data_dir);
        if let Some(db_path) = db_override {
            config.db_path = db_path;
        }
        config
    }

    /// Layout rooted at `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

fn default_data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}
