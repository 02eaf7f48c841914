use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::ValidationError;
use crate::models::{Book, BookDraft};

/// Text typed into the book form. Values stay raw until submission so the
/// user sees exactly what they entered when validation fails.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
}

impl BookField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Judul",
            BookField::Author => "Pengarang",
            BookField::Year => "Tahun",
        }
    }
}

impl BookForm {
    /// Populate the form from an existing book when editing. An unknown year
    /// shows as an empty field rather than `0`.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year_text(),
            active: BookField::Title,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Year,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
        };
    }

    /// Append a character to the active field. Control characters are ignored;
    /// the year field accepts anything so the store can report bad input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Validate the inputs without touching the store.
    pub(crate) fn parse_inputs(&self) -> Result<BookDraft, ValidationError> {
        BookDraft::parse(&self.title, &self.author, &self.year)
    }

    pub(crate) fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            match field {
                BookField::Year => "<optional>".to_string(),
                _ => "<required>".to_string(),
            }
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the active field, counting the label prefix.
    pub(crate) fn cursor_offset(&self) -> usize {
        let prefix = self.active.label().chars().count() + 2;
        prefix + self.value(self.active).chars().count()
    }
}

/// Book awaiting a yes/no answer before deletion.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
}

impl From<&Book> for ConfirmDelete {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_active_field() {
        let mut form = BookForm::default();
        for ch in "Dune".chars() {
            assert!(form.push_char(ch));
        }
        form.next_field();
        for ch in "Herbert".chars() {
            form.push_char(ch);
        }
        form.next_field();
        form.push_char('1');
        form.push_char('9');
        form.backspace();
        assert!(!form.push_char('\u{7}'));

        assert_eq!(form.title, "Dune");
        assert_eq!(form.author, "Herbert");
        assert_eq!(form.year, "1");
    }

    #[test]
    fn field_focus_wraps_both_ways() {
        let mut form = BookForm::default();
        form.previous_field();
        assert_eq!(form.active, BookField::Year);
        form.next_field();
        assert_eq!(form.active, BookField::Title);
    }

    #[test]
    fn from_book_blanks_unknown_year() {
        let book = Book {
            id: 2,
            title: "Foundation".into(),
            author: "Asimov".into(),
            year: 0,
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.year, "");
        assert_eq!(form.parse_inputs().unwrap().year, 0);
    }

    #[test]
    fn cursor_offset_counts_label_and_value() {
        let mut form = BookForm::default();
        form.title = "Dune".into();
        assert_eq!(form.cursor_offset(), "Judul: ".len() + 4);
    }
}
