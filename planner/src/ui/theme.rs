//! Color theme and styling for the planning board

use planner_core::ArtifactKind;
use ratatui::style::{Color, Modifier, Style};

/// Board UI color theme
#[derive(Debug, Clone)]
pub struct BoardTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Card borders
    pub card_border: Color,
    pub card_cursor: Color,
    pub card_highlight: Color,

    // Column accents
    pub requirement: Color,
    pub epic: Color,
    pub story: Color,
    pub task: Color,

    // Text colors
    pub id_text: Color,
    pub system_text: Color,
    pub error_text: Color,
}

impl Default for BoardTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            card_border: Color::Gray,
            card_cursor: Color::Yellow,
            card_highlight: Color::Blue,

            requirement: Color::LightMagenta,
            epic: Color::LightGreen,
            story: Color::LightCyan,
            task: Color::LightYellow,

            id_text: Color::DarkGray,
            system_text: Color::DarkGray,
            error_text: Color::LightRed,
        }
    }
}

impl BoardTheme {
    /// Accent color of a column
    pub fn accent(&self, kind: ArtifactKind) -> Color {
        match kind {
            ArtifactKind::Requirement => self.requirement,
            ArtifactKind::Epic => self.epic,
            ArtifactKind::Story => self.story,
            ArtifactKind::Task => self.task,
        }
    }

    /// Get border style for panels and dialogs
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Card border: the cursor wins over the highlight.
    pub fn card_border_style(&self, under_cursor: bool, highlighted: bool) -> Style {
        if under_cursor {
            Style::default()
                .fg(self.card_cursor)
                .add_modifier(Modifier::BOLD)
        } else if highlighted {
            Style::default()
                .fg(self.card_highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.card_border)
        }
    }

    /// Get column title style
    pub fn title_style(&self, kind: ArtifactKind, focused: bool) -> Style {
        let style = Style::default().fg(self.accent(kind));
        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub fn id_style(&self) -> Style {
        Style::default().fg(self.id_text)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_text)
            .add_modifier(Modifier::BOLD)
    }
}
