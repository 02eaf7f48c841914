//! Scriptable command line. Without a subcommand the binary launches the
//! terminal UI; each subcommand maps onto exactly one catalog request.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::db::Catalog;
use crate::export::export_all;
use crate::models::Book;

#[derive(Debug, Parser)]
#[command(name = "book-catalog", version, about = "Maintain a small catalog of books")]
pub struct Cli {
    /// Use this SQLite file instead of the one in the data directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive terminal form (default).
    Tui,
    /// Print books, optionally only those whose title contains a substring.
    List {
        #[arg(long, short, default_value = "")]
        search: String,
    },
    /// Print a single book.
    Show { id: i64 },
    /// Add a book and print its id.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        year: String,
    },
    /// Replace the title, author and year of a book.
    Update {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        year: String,
    },
    /// Delete a book. Requires --yes.
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Write every book to a CSV file.
    Export {
        /// Destination file; defaults to books_export.csv.
        path: Option<PathBuf>,
    },
}

/// Execute one non-interactive command, writing human readable output to `out`.
pub fn run(
    command: Command,
    catalog: &Catalog,
    default_export: PathBuf,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Tui => bail!("the terminal UI is not a one-shot command"),
        Command::List { search } => {
            let books = catalog.list(search.trim())?;
            write_table(out, &books)?;
        }
        Command::Show { id } => {
            let book = catalog.fetch(id)?;
            write_table(out, std::slice::from_ref(&book))?;
        }
        Command::Add {
            title,
            author,
            year,
        } => {
            let id = catalog.create(&title, &author, &year)?;
            writeln!(out, "Added book {id}.")?;
        }
        Command::Update {
            id,
            title,
            author,
            year,
        } => {
            if catalog.update(id, &title, &author, &year)? {
                writeln!(out, "Updated book {id}.")?;
            } else {
                tracing::warn!(id, "update requested for missing book");
                writeln!(out, "No book with id {id}; nothing changed.")?;
            }
        }
        Command::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete book {id} without --yes");
            }
            if catalog.delete(id)? {
                writeln!(out, "Deleted book {id}.")?;
            } else {
                writeln!(out, "No book with id {id}; nothing deleted.")?;
            }
        }
        Command::Export { path } => {
            let summary = export_all(catalog, path.unwrap_or(default_export))?;
            writeln!(
                out,
                "Exported {} book(s) to {}.",
                summary.rows,
                summary.path.display()
            )?;
        }
    }
    Ok(())
}

fn write_table(out: &mut impl Write, books: &[Book]) -> Result<()> {
    let title_width = column_width(books.iter().map(|b| b.title.as_str()), "Judul");
    let author_width = column_width(books.iter().map(|b| b.author.as_str()), "Pengarang");

    writeln!(
        out,
        "{:>4}  {:<title_width$}  {:<author_width$}  {}",
        "ID", "Judul", "Pengarang", "Tahun"
    )?;
    for book in books {
        writeln!(
            out,
            "{:>4}  {:<title_width$}  {:<author_width$}  {}",
            book.id, book.title, book.author, book.year
        )?;
    }
    Ok(())
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}
