use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::{CatalogError, ValidationError};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column for a cursor `offset` characters into `inner`, pinned to the last
/// cell when the text is wider than the area.
pub(crate) fn cursor_column(inner: Rect, offset: usize) -> u16 {
    let max_offset = inner.width.saturating_sub(1);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX).min(max_offset);
    inner.x.saturating_add(offset)
}

/// Turn a failed request into the sentence shown in the footer.
pub(crate) fn surface_error(err: &CatalogError) -> String {
    match err {
        CatalogError::Validation(ValidationError::MissingField { .. }) => {
            "Title and author are required.".to_string()
        }
        CatalogError::Validation(ValidationError::NonNumericYear { .. }) => {
            "Year must be a number.".to_string()
        }
        CatalogError::NotFound { id } => format!("Book {id} no longer exists."),
        CatalogError::Io { path, source } => {
            format!("Could not write {}: {source}", path.display())
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }

    #[test]
    fn cursor_column_is_clamped_to_area() {
        let inner = Rect::new(5, 2, 20, 1);
        assert_eq!(cursor_column(inner, 3), 8);
        assert_eq!(cursor_column(inner, 19), 24);
        assert_eq!(cursor_column(inner, 500), 24);
        assert_eq!(cursor_column(inner, usize::MAX), 24);
        assert_eq!(cursor_column(Rect::new(7, 0, 0, 0), 10), 7);
    }

    #[test]
    fn surface_error_is_user_facing() {
        let err = CatalogError::from(ValidationError::MissingField { field: "author" });
        assert_eq!(surface_error(&err), "Title and author are required.");
        assert_eq!(
            surface_error(&CatalogError::NotFound { id: 9 }),
            "Book 9 no longer exists."
        );
    }
}
