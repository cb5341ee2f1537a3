//! One board column of cards

use planner_core::{ArtifactKind, CardView, PREVIEW_CHARS};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::layout::{scroll_offset, visible_cards, CARD_HEIGHT};
use crate::ui::theme::BoardTheme;

/// A titled column rendering its cards top to bottom
pub struct CardColumnWidget<'a> {
    kind: ArtifactKind,
    cards: &'a [CardView],
    theme: &'a BoardTheme,
    focused: bool,
    cursor: usize,
}

impl<'a> CardColumnWidget<'a> {
    pub fn new(kind: ArtifactKind, cards: &'a [CardView], theme: &'a BoardTheme) -> Self {
        Self {
            kind,
            cards,
            theme,
            focused: false,
            cursor: 0,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    fn empty_hint(&self) -> &'static str {
        match self.kind {
            ArtifactKind::Requirement => "No requirements yet. Press a to add one.",
            ArtifactKind::Epic => "Press g on a requirement to convert it to an epic.",
            ArtifactKind::Story => "Press g on an epic to generate user stories.",
            ArtifactKind::Task => "Press g on a story to break it into tasks.",
        }
    }
}

impl Widget for CardColumnWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.kind.column_title()),
                self.theme.title_style(self.kind, self.focused),
            ),
            Span::styled(format!("({}) ", self.cards.len()), self.theme.id_style()),
        ]);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.cards.is_empty() {
            Paragraph::new(Span::styled(self.empty_hint(), self.theme.system_style()))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        let visible = visible_cards(inner.height);
        let offset = scroll_offset(self.cursor, visible);

        for (row, (index, card)) in self
            .cards
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let y = inner.y + row as u16 * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(inner.bottom().saturating_sub(y));
            if height == 0 {
                break;
            }
            let card_area = Rect::new(inner.x, y, inner.width, height);
            let under_cursor = self.focused && index == self.cursor;
            render_card(card, under_cursor, self.theme, card_area, buf);
        }
    }
}

fn render_card(card: &CardView, under_cursor: bool, theme: &BoardTheme, area: Rect, buf: &mut Buffer) {
    let mut title = vec![Span::styled(format!(" #{} ", card.id), theme.id_style())];
    if card.highlighted {
        title.push(Span::styled(
            "● ",
            Style::default()
                .fg(theme.card_highlight)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(theme.card_border_style(under_cursor, card.highlighted));

    Paragraph::new(card.preview(PREVIEW_CHARS))
        .style(theme.text_style())
        .block(block)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
