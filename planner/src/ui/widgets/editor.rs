//! Multi-line editor dialog widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::editor::TextEditor;
use crate::ui::theme::BoardTheme;

/// Dialog with a title, the editable text and a key hint footer
pub struct EditorWidget<'a> {
    title: &'a str,
    editor: &'a TextEditor,
    theme: &'a BoardTheme,
}

impl<'a> EditorWidget<'a> {
    pub fn new(title: &'a str, editor: &'a TextEditor, theme: &'a BoardTheme) -> Self {
        Self {
            title,
            editor,
            theme,
        }
    }

    fn cursor_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

impl Widget for EditorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_bottom(Line::from(Span::styled(
                " Ctrl+S save  Esc cancel  Enter newline ",
                self.theme.system_style(),
            )))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let (cursor_line, cursor_col) = self.editor.line_col();
        let visible_rows = usize::from(inner.height.max(1));
        let first_line = (cursor_line + 1).saturating_sub(visible_rows);

        let lines: Vec<Line> = self
            .editor
            .lines()
            .into_iter()
            .enumerate()
            .skip(first_line)
            .take(visible_rows)
            .map(|(idx, text)| {
                if idx != cursor_line {
                    return Line::from(text.to_string());
                }
                let before: String = text.chars().take(cursor_col).collect();
                let at: String = text
                    .chars()
                    .nth(cursor_col)
                    .map(String::from)
                    .unwrap_or_else(|| " ".to_string());
                let after: String = text.chars().skip(cursor_col + 1).collect();
                Line::from(vec![
                    Span::raw(before),
                    Span::styled(at, self.cursor_style()),
                    Span::raw(after),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .style(self.theme.text_style())
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_text_and_hints() {
        let theme = BoardTheme::default();
        let editor = TextEditor::new("line one\nline two");
        let area = Rect::new(0, 0, 50, 8);
        let mut buf = Buffer::empty(area);
        EditorWidget::new("Details: epic #2", &editor, &theme).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Details: epic #2"));
        assert!(text.contains("line one"));
        assert!(text.contains("line two"));
        assert!(text.contains("Ctrl+S save"));
    }

    #[test]
    fn test_scrolls_to_cursor_line() {
        let theme = BoardTheme::default();
        let body: Vec<String> = (0..20).map(|i| format!("row {i}")).collect();
        let editor = TextEditor::new(body.join("\n"));
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        EditorWidget::new("Edit", &editor, &theme).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("row 19"));
        assert!(!text.contains("row 0 "));
    }
}
