//! Persistence layer: an owned [`Catalog`] handle over the embedded SQLite
//! database. Connection lifecycle lives in `connection`, the book queries in
//! `books`.

mod books;
mod connection;

pub use connection::Catalog;
