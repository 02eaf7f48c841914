//! Domain models that mirror the SQLite schema and get passed between the
//! store and the shells. They stay plain data holders; validation of raw user
//! text happens once, in [`BookDraft::parse`], so create and update share it.

use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `books` table.
pub struct Book {
    /// Primary key assigned by SQLite. Never reused after deletion.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year, `0` when unknown.
    pub year: i64,
}

impl Book {
    /// Year as shown in an edit field: blank when unspecified.
    pub fn year_text(&self) -> String {
        if self.year == 0 {
            String::new()
        } else {
            self.year.to_string()
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year == 0 {
            write!(f, "{} - {}", self.title, self.author)
        } else {
            write!(f, "{} - {} ({})", self.title, self.author, self.year)
        }
    }
}

/// Validated field values ready to be written by either create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: i64,
}

impl BookDraft {
    /// Trim and validate raw form input.
    ///
    /// Title and author must be non-empty after trimming. A blank year means
    /// `0`; anything else must parse as an integer.
    pub fn parse(title: &str, author: &str, year_text: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingField { field: "title" });
        }
        let author = author.trim();
        if author.is_empty() {
            return Err(ValidationError::MissingField { field: "author" });
        }
        let year = parse_year(year_text)?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            year,
        })
    }
}

fn parse_year(raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .map_err(|_| ValidationError::NonNumericYear {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_fields_and_defaults_year() {
        let draft = BookDraft::parse("  Foundation ", "\tAsimov", "").unwrap();
        assert_eq!(
            draft,
            BookDraft {
                title: "Foundation".to_string(),
                author: "Asimov".to_string(),
                year: 0,
            }
        );
    }

    #[test]
    fn parse_accepts_signed_and_padded_years() {
        assert_eq!(BookDraft::parse("a", "b", " 1965 ").unwrap().year, 1965);
        assert_eq!(BookDraft::parse("a", "b", "-300").unwrap().year, -300);
        assert_eq!(BookDraft::parse("a", "b", "   ").unwrap().year, 0);
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert_eq!(
            BookDraft::parse("   ", "Herbert", "1965"),
            Err(ValidationError::MissingField { field: "title" })
        );
        assert_eq!(
            BookDraft::parse("Dune", "", "1965"),
            Err(ValidationError::MissingField { field: "author" })
        );
    }

    #[test]
    fn parse_rejects_non_numeric_year() {
        for bad in ["abc", "19x5", "1965.0", "99999999999999999999"] {
            assert!(
                matches!(
                    BookDraft::parse("Dune", "Herbert", bad),
                    Err(ValidationError::NonNumericYear { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn year_text_blanks_unknown_year() {
        let mut book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            year: 0,
        };
        assert_eq!(book.year_text(), "");
        assert_eq!(book.to_string(), "Dune - Herbert");
        book.year = 1965;
        assert_eq!(book.year_text(), "1965");
        assert_eq!(book.to_string(), "Dune - Herbert (1965)");
    }
}
