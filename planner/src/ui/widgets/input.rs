//! Command line widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::BoardTheme;

/// Single-line `:` command input
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a BoardTheme,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a BoardTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Press : for commands",
            is_active: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if !self.is_active {
            Line::from(Span::styled(
                self.placeholder,
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            let display = self.content.strip_prefix(':').unwrap_or(self.content);
            let cursor = self.cursor_position.saturating_sub(1);

            // Use character-based slicing for unicode safety
            let before_cursor: String = display.chars().take(cursor).collect();
            let at_cursor = display
                .chars()
                .nth(cursor)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after_cursor: String = display.chars().skip(cursor + 1).collect();

            Line::from(vec![
                Span::styled(":", self.theme.id_style()),
                Span::raw(before_cursor),
                Span::styled(
                    at_cursor,
                    Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                ),
                Span::raw(after_cursor),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
