//! Layout calculations for the planning board

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of one card including its border.
pub const CARD_HEIGHT: u16 = 6;

/// Calculate the main layout areas
pub struct AppLayout {
    pub title_area: Rect,
    pub columns: [Rect; 4],
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
    pub input_area: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(8),    // Board
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Hotkey bar
                Constraint::Length(3), // Command line
            ])
            .split(area);

        // Four equal columns
        let column_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(main_chunks[1]);

        Self {
            title_area: main_chunks[0],
            columns: [
                column_chunks[0],
                column_chunks[1],
                column_chunks[2],
                column_chunks[3],
            ],
            status_bar: main_chunks[2],
            hotkey_bar: main_chunks[3],
            input_area: main_chunks[4],
        }
    }
}

/// How many whole cards fit in a column body of `height` rows.
pub fn visible_cards(height: u16) -> usize {
    usize::from((height / CARD_HEIGHT).max(1))
}

/// First card index to draw so that `cursor` stays on screen.
pub fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return cursor;
    }
    (cursor + 1).saturating_sub(visible)
}

/// Calculate centered popup area
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Calculate fixed-size centered popup
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_equal_columns() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 120, 40));
        let widths: Vec<u16> = layout.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![30, 30, 30, 30]);
        assert_eq!(layout.title_area.height, 1);
        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.columns[0].height, 40 - 1 - 1 - 1 - 3);
    }

    #[test]
    fn test_scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 3), 0);
        assert_eq!(scroll_offset(2, 3), 0);
        assert_eq!(scroll_offset(3, 3), 1);
        assert_eq!(scroll_offset(9, 3), 7);
        assert_eq!(visible_cards(2), 1);
        assert_eq!(visible_cards(18), 3);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect_fixed(60, 20, area);
        assert_eq!(popup, Rect::new(0, 0, 40, 10));

        let popup = centered_rect_fixed(20, 4, area);
        assert_eq!(popup, Rect::new(10, 3, 20, 4));
    }
}
