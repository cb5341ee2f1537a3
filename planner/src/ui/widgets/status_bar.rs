//! Status bar widget

use planner_core::ArtifactKind;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::{InputMode, Status};
use crate::ui::theme::BoardTheme;

/// Status bar widget showing the mode and the last message
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a BoardTheme,
    message: Option<&'a Status>,
    busy: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a BoardTheme) -> Self {
        Self {
            input_mode,
            theme,
            message: None,
            busy: false,
        }
    }

    pub fn message(mut self, message: Option<&'a Status>) -> Self {
        self.message = message;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Input mode indicator (vim-style)
        let (input_mode_text, input_mode_style) = match self.input_mode {
            InputMode::Normal => ("NORMAL", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            InputMode::Insert => ("INSERT", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            InputMode::Command => ("COMMAND", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        };

        let mut spans = vec![Span::styled(format!("-- {input_mode_text} --"), input_mode_style)];

        if self.busy {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "WORKING",
                Style::default()
                    .fg(self.theme.card_cursor)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(status) = self.message {
            let style = if status.is_error {
                self.theme.error_style()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(status.text.as_str(), style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkey bar widget
pub struct HotkeyBarWidget {
    input_mode: InputMode,
    focused: ArtifactKind,
}

impl HotkeyBarWidget {
    pub fn new(input_mode: InputMode, focused: ArtifactKind) -> Self {
        Self {
            input_mode,
            focused,
        }
    }

    fn generate_hint(&self) -> Option<&'static str> {
        match self.focused {
            ArtifactKind::Requirement => Some("g:to epic"),
            ArtifactKind::Epic => Some("g:stories"),
            ArtifactKind::Story => Some("g:tasks"),
            ArtifactKind::Task => None,
        }
    }
}

impl Widget for HotkeyBarWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hotkeys = match self.input_mode {
            InputMode::Normal => {
                let mut keys = vec![("a:add", true)];
                if let Some(hint) = self.generate_hint() {
                    keys.push((hint, true));
                }
                if self.focused == ArtifactKind::Task {
                    keys.push(("s:select", true));
                }
                keys.extend([
                    ("Enter:details", true),
                    ("d:delete", true),
                    ("h/l:column", false),
                    ("j/k:card", false),
                    ("?:help", false),
                    ("q:quit", false),
                ]);
                keys
            }
            InputMode::Insert => vec![
                ("Ctrl+S:save", true),
                ("Esc:cancel", true),
                ("Enter:newline", false),
            ],
            InputMode::Command => vec![
                ("Esc:cancel", true),
                ("Enter:execute", true),
                (":add <text>", false),
                (":q quit", false),
                (":help", false),
            ],
        };

        let spans: Vec<Span> = hotkeys
            .iter()
            .flat_map(|(text, primary)| {
                let style = if *primary {
                    Style::default()
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                };
                vec![Span::styled(*text, style), Span::raw("  ")]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(widget: impl Widget) -> String {
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_status_shows_mode_and_message() {
        let theme = BoardTheme::default();
        let status = Status {
            text: "Added requirement #1".to_string(),
            is_error: false,
        };
        let text = line_text(StatusBarWidget::new(InputMode::Normal, &theme).message(Some(&status)));
        assert!(text.contains("-- NORMAL --"));
        assert!(text.contains("Added requirement #1"));
        assert!(!text.contains("WORKING"));
    }

    #[test]
    fn test_error_message_styled() {
        let theme = BoardTheme::default();
        let status = Status {
            text: "Generation failed".to_string(),
            is_error: true,
        };
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(InputMode::Normal, &theme)
            .message(Some(&status))
            .render(area, &mut buf);

        let start = "-- NORMAL -- | ".chars().count() as u16;
        assert_eq!(buf[(start, 0)].fg, theme.error_text);
    }

    #[test]
    fn test_busy_indicator() {
        let theme = BoardTheme::default();
        let text = line_text(StatusBarWidget::new(InputMode::Normal, &theme).busy(true));
        assert!(text.contains("WORKING"));
    }

    #[test]
    fn test_hotkeys_follow_focus() {
        let requirement = line_text(HotkeyBarWidget::new(InputMode::Normal, ArtifactKind::Requirement));
        assert!(requirement.contains("g:to epic"));
        assert!(!requirement.contains("s:select"));

        let task = line_text(HotkeyBarWidget::new(InputMode::Normal, ArtifactKind::Task));
        assert!(task.contains("s:select"));
        assert!(!task.contains("g:"));

        let insert = line_text(HotkeyBarWidget::new(InputMode::Insert, ArtifactKind::Epic));
        assert!(insert.contains("Ctrl+S:save"));
    }
}
