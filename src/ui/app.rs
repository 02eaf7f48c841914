use std::mem;
use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::db::Catalog;
use crate::error::{CatalogError, Result};
use crate::export::export_all;

use super::forms::{BookField, BookForm, ConfirmDelete};
use super::helpers::{centered_rect, cursor_column, surface_error};
use super::screens::BookListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 10;

/// What the keyboard is currently driving.
enum Mode {
    Normal,
    /// The add/edit form. `editing` is `None` for a new book and the id of the
    /// book being replaced otherwise; submission dispatches on it.
    Form {
        editing: Option<i64>,
        form: BookForm,
    },
    ConfirmDelete(ConfirmDelete),
    /// Live search; `previous` restores the filter on Esc.
    Searching { previous: String },
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end state. Owns the catalog for as long as the UI runs and
/// hands it back through [`App::into_catalog`] so `main` can close it.
pub struct App {
    catalog: Catalog,
    list: BookListScreen,
    mode: Mode,
    status: Option<StatusMessage>,
    export_path: PathBuf,
}

impl App {
    pub fn new(catalog: Catalog, export_path: PathBuf) -> Result<Self> {
        let books = catalog.list("")?;
        Ok(Self {
            catalog,
            list: BookListScreen::new(books),
            mode: Mode::Normal,
            status: None,
            export_path,
        })
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Feed one key press through the state machine. Returns `true` when the
    /// user asked to quit. Failed requests become status messages; none of
    /// them end the session.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Form { editing, form } => self.handle_form(code, editing, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching { previous } => self.handle_search(code, previous),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.list.filter.is_empty() {
                    *exit = true;
                } else {
                    self.list.filter.clear();
                    self.reload(None);
                    self.set_status("Search cleared.", StatusKind::Info);
                }
            }
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char('a') | KeyCode::Char('+') => {
                self.clear_status();
                return Mode::Form {
                    editing: None,
                    form: BookForm::default(),
                };
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let Some(id) = self.list.current_book().map(|b| b.id) else {
                    self.set_status("No book selected to edit.", StatusKind::Error);
                    return Mode::Normal;
                };
                match self.catalog.fetch(id) {
                    Ok(book) => {
                        self.clear_status();
                        return Mode::Form {
                            editing: Some(book.id),
                            form: BookForm::from_book(&book),
                        };
                    }
                    Err(err) => {
                        self.report_error(&err);
                        self.reload(None);
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(book) = self.list.current_book() {
                    let confirm = ConfirmDelete::from(book);
                    self.clear_status();
                    return Mode::ConfirmDelete(confirm);
                }
                self.set_status("Select a book to delete.", StatusKind::Error);
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                return Mode::Searching {
                    previous: self.list.filter.clone(),
                };
            }
            KeyCode::Char('x') => self.export(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_form(&mut self, code: KeyCode, editing: Option<i64>, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                let text = if editing.is_some() {
                    "Edit cancelled."
                } else {
                    "Add book cancelled."
                };
                self.set_status(text, StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit(editing, &form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    self.report_error(&err);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Form { editing, form }
    }

    /// Create or update depending on which book, if any, the form is editing.
    fn submit(&mut self, editing: Option<i64>, form: &BookForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        match editing {
            None => {
                let id = self.catalog.insert(&draft)?;
                self.reload(Some(id));
                self.set_status(format!("Added \"{}\".", draft.title), StatusKind::Info);
            }
            Some(id) => {
                if self.catalog.replace(id, &draft)? {
                    self.set_status(format!("Updated \"{}\".", draft.title), StatusKind::Info);
                } else {
                    warn!(id, "edited book disappeared before saving");
                    self.set_status(
                        format!("Book {id} no longer exists; nothing saved."),
                        StatusKind::Error,
                    );
                }
                self.reload(Some(id));
            }
        }
        Ok(())
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.catalog.delete(confirm.id) {
                    Ok(true) => {
                        self.reload(None);
                        self.set_status(
                            format!("Deleted \"{}\".", confirm.title),
                            StatusKind::Info,
                        );
                        Mode::Normal
                    }
                    Ok(false) => {
                        warn!(id = confirm.id, "deleted book was already gone");
                        self.reload(None);
                        self.set_status(
                            format!("Book {} no longer exists; nothing deleted.", confirm.id),
                            StatusKind::Error,
                        );
                        Mode::Normal
                    }
                    Err(err) => {
                        self.report_error(&err);
                        Mode::ConfirmDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_search(&mut self, code: KeyCode, previous: String) -> Mode {
        match code {
            KeyCode::Esc => {
                self.list.filter = previous;
                self.reload(None);
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::Backspace => {
                self.list.filter.pop();
                self.reload(None);
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                self.list.filter.push(ch);
                self.reload(None);
            }
            _ => {}
        }
        Mode::Searching { previous }
    }

    fn export(&mut self) {
        match export_all(&self.catalog, &self.export_path) {
            Ok(summary) => self.set_status(
                format!(
                    "Exported {} book(s) to {}.",
                    summary.rows,
                    summary.path.display()
                ),
                StatusKind::Info,
            ),
            Err(err) => self.report_error(&err),
        }
    }

    /// Re-run the current search so the table mirrors the store.
    fn reload(&mut self, focus_id: Option<i64>) {
        match self.catalog.list(self.list.query()) {
            Ok(books) => self.list.set_books(books, focus_id),
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&mut self, err: &CatalogError) {
        if err.is_validation() {
            info!(%err, "rejected input");
        } else {
            warn!(%err, "request failed");
        }
        self.set_status(surface_error(err), StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_table(frame, content_area);
        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Form { editing, form } => {
                let title = if editing.is_some() {
                    "Edit Book"
                } else {
                    "Add Book"
                };
                self.draw_form(frame, area, title, form);
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching { .. } => self.draw_search_bar(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let title = if self.list.query().is_empty() {
            format!("Books ({})", self.list.books.len())
        } else {
            format!(
                "Books matching \"{}\" ({})",
                self.list.query(),
                self.list.books.len()
            )
        };
        let block = Block::default().title(title).borders(Borders::ALL);

        if self.list.books.is_empty() {
            let message = if self.list.query().is_empty() {
                "No books yet. Press [a] to add one."
            } else {
                "No titles match the search."
            };
            let paragraph = Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            )))
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(
            ["ID", "Judul", "Pengarang", "Tahun"]
                .into_iter()
                .map(|label| Cell::from(label).style(header_style)),
        );
        let rows = self.list.books.iter().map(|book| {
            Row::new(vec![
                Cell::from(book.id.to_string()),
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(book.year.to_string()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(50),
                Constraint::Percentage(35),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default().with_selected(Some(self.list.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&'static str, &'static str)] = match &self.mode {
            Mode::Normal => &[
                ("[a]", " Add   "),
                ("[e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[/]", " Search   "),
                ("[x]", " Export CSV   "),
                ("[q]", " Quit"),
            ],
            Mode::Form { .. } => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
            Mode::Searching { .. } => &[
                ("[Enter]", " Keep filter   "),
                ("[Esc]", " Restore previous filter"),
            ],
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, text)| [Span::styled(*key, key_style), Span::raw(*text)])
                .collect::<Vec<_>>(),
        )
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Cari Judul");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", self.list.filter)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let offset = "Search: ".len() + self.list.filter.chars().count();
        frame.set_cursor_position((cursor_column(inner, offset), inner.y));
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [BookField::Title, BookField::Author, BookField::Year];
        let mut lines: Vec<Line> = fields.iter().map(|&f| form.build_line(f)).collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = fields
            .iter()
            .position(|&f| f == form.active)
            .unwrap_or(0) as u16;
        frame.set_cursor_position((
            cursor_column(inner, form.cursor_offset()),
            inner.y.saturating_add(row),
        ));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete \"{}\" (ID {})?", confirm.title, confirm.id)),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(books: &[(&str, &str, &str)]) -> App {
        let catalog = Catalog::open_in_memory().unwrap();
        for (title, author, year) in books {
            catalog.create(title, author, year).unwrap();
        }
        App::new(catalog, PathBuf::from("unused.csv")).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            assert!(!app.handle_key(KeyCode::Char(ch)));
        }
    }

    fn status_text(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    #[test]
    fn add_form_creates_book_and_focuses_it() {
        let mut app = app_with(&[("Dune", "Herbert", "1965")]);

        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "Foundation");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Asimov");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.list.books.len(), 2);
        let current = app.list.current_book().unwrap();
        assert_eq!(current.title, "Foundation");
        assert_eq!(current.year, 0);
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let mut app = app_with(&[]);

        app.handle_key(KeyCode::Char('+'));
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Enter);

        match &app.mode {
            Mode::Form { editing, form } => {
                assert!(editing.is_none());
                assert_eq!(form.error.as_deref(), Some("Title and author are required."));
            }
            _ => panic!("form should stay open"),
        }
        assert_eq!(app.catalog.count().unwrap(), 0);

        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Herbert");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "soon");
        app.handle_key(KeyCode::Enter);
        assert_eq!(status_text(&app), "Year must be a number.");
        assert_eq!(app.catalog.count().unwrap(), 0);
    }

    #[test]
    fn edit_replaces_selected_book() {
        let mut app = app_with(&[("Dune", "Herbert", "1965"), ("Emma", "Austen", "")]);
        app.handle_key(KeyCode::Down);

        app.handle_key(KeyCode::Enter);
        match &app.mode {
            Mode::Form { editing, form } => {
                assert_eq!(*editing, Some(2));
                assert_eq!(form.year, "");
            }
            _ => panic!("expected edit form"),
        }

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "1815");
        app.handle_key(KeyCode::Enter);

        let book = app.catalog.fetch(2).unwrap();
        assert_eq!(book.year, 1815);
        assert_eq!(book.title, "Emma");
        assert_eq!(app.catalog.count().unwrap(), 2);
        assert_eq!(app.list.current_book().map(|b| b.id), Some(2));
    }

    #[test]
    fn editing_a_vanished_book_reports_error() {
        let mut app = app_with(&[("Dune", "Herbert", "1965")]);
        app.catalog.delete(1).unwrap();

        app.handle_key(KeyCode::Char('e'));
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), "Book 1 no longer exists.");
        assert!(app.list.books.is_empty());
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app_with(&[("Dune", "Herbert", "1965"), ("Emma", "Austen", "")]);

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.catalog.count().unwrap(), 2);

        app.handle_key(KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('y'));
        assert_eq!(app.catalog.count().unwrap(), 1);
        assert_eq!(app.list.books[0].title, "Emma");
    }

    #[test]
    fn confirming_delete_of_vanished_book_reports_no_op() {
        let mut app = app_with(&[("Dune", "Herbert", "1965")]);
        app.catalog.delete(1).unwrap();

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('y'));

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), "Book 1 no longer exists; nothing deleted.");
        assert!(matches!(app.status.as_ref().map(|s| &s.kind), Some(StatusKind::Error)));
        assert!(app.list.books.is_empty());
    }

    #[test]
    fn search_filters_live_and_esc_restores() {
        let mut app = app_with(&[("Dune", "Herbert", "1965"), ("Emma", "Austen", "")]);

        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "Du");
        assert_eq!(app.list.books.len(), 1);

        app.handle_key(KeyCode::Esc);
        assert!(app.list.filter.is_empty());
        assert_eq!(app.list.books.len(), 2);

        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, " Emma ");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.list.books.len(), 1);

        // Esc in normal mode clears the search before it quits.
        assert!(!app.handle_key(KeyCode::Esc));
        assert_eq!(app.list.books.len(), 2);
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn mutations_refresh_with_active_filter() {
        let mut app = app_with(&[("Dune", "Herbert", "1965")]);
        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "Emma");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Austen");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.catalog.count().unwrap(), 2);
        assert_eq!(app.list.books.len(), 1);
        assert_eq!(app.list.books[0].title, "Dune");
    }

    #[test]
    fn export_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("books.csv");
        let catalog = Catalog::open_in_memory().unwrap();
        catalog.create("Dune", "Herbert", "1965").unwrap();
        let mut app = App::new(catalog, out.clone()).unwrap();

        app.handle_key(KeyCode::Char('x'));

        assert!(out.exists());
        assert_eq!(
            status_text(&app),
            format!("Exported 1 book(s) to {}.", out.display())
        );
    }

    #[test]
    fn export_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("books.csv");
        let mut app = App::new(Catalog::open_in_memory().unwrap(), out).unwrap();

        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(status_text(&app).starts_with("Could not write"));
        assert!(matches!(app.status.as_ref().map(|s| &s.kind), Some(StatusKind::Error)));
    }

    #[test]
    fn q_quits() {
        let mut app = app_with(&[]);
        assert!(app.handle_key(KeyCode::Char('q')));
        app.into_catalog().close().unwrap();
    }
}
