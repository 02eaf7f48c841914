//! Core library for the book catalog.
//!
//! The persistence layer (`db`), the CSV exporter and the error taxonomy form
//! the contract every shell relies on; `ui` and `cli` are the two shells the
//! binary ships with.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;

pub use db::Catalog;
pub use error::{CatalogError, Result, ValidationError};
pub use export::{export_all, ExportSummary};
pub use models::{Book, BookDraft};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
