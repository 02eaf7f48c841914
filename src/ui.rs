//! Ratatui front-end: a table of books with an add/edit form, live title
//! search, a delete confirmation, and CSV export on a key press. All state
//! transitions live in `app`; `terminal` only owns the raw-mode session.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
