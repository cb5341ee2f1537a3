//! Render orchestration for the planning board TUI

use planner_core::{ArtifactKind, Card, CompletionBackend};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, EditTarget, InputMode, Overlay};
use crate::ui::layout::{centered_rect, centered_rect_fixed, AppLayout};
use crate::ui::widgets::{
    CardColumnWidget, EditorWidget, HotkeyBarWidget, InputWidget, StatusBarWidget,
};

/// Main render function
pub fn render<B: CompletionBackend>(frame: &mut Frame, app: &App<B>) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);
    render_board(frame, app, &layout);
    render_status_bar(frame, app, layout.status_bar);
    render_hotkey_bar(frame, app, layout.hotkey_bar);
    render_input(frame, app, layout.input_area);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title bar with the current selection
fn render_title_bar<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let mut spans = vec![Span::styled(
        " Agile Sprint Planning ",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(task) = app.board.selection() {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            format!(
                "Selected task #{} (story #{}, epic #{}, requirement #{})",
                task.id(),
                task.story_id(),
                task.epic_id(),
                task.requirement_id()
            ),
            Style::default().fg(app.theme.card_highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the four card columns
fn render_board<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, layout: &AppLayout) {
    let view = app.view();
    for kind in ArtifactKind::ALL {
        let widget = CardColumnWidget::new(kind, view.column(kind), &app.theme)
            .focused(app.focused_column() == kind)
            .cursor(app.cursor(kind));
        frame.render_widget(widget, layout.columns[kind.column_index()]);
    }
}

/// Render the status bar
fn render_status_bar<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let widget = StatusBarWidget::new(app.input_mode, &app.theme)
        .message(app.status())
        .busy(app.has_pending());
    frame.render_widget(widget, area);
}

/// Render the hotkey bar
fn render_hotkey_bar<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    frame.render_widget(HotkeyBarWidget::new(app.input_mode, app.focused_column()), area);
}

/// Render the command line
fn render_input<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let placeholder = if app.has_pending() {
        "Waiting for the model..."
    } else {
        "Press : for commands"
    };

    let widget = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(app.input_mode == InputMode::Command)
        .placeholder(placeholder);
    frame.render_widget(widget, area);
}

/// Render overlay
fn render_overlay<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::Editor { target, editor } => {
            let title = match target {
                EditTarget::NewRequirement => "Add Requirement".to_string(),
                EditTarget::Card { kind, id } => format!("Details: {kind} #{id}"),
            };
            let popup_area = centered_rect(70, 60, area);
            frame.render_widget(EditorWidget::new(&title, editor, &app.theme), popup_area);
        }
    }
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::UNDERLINED),
    ))
}

/// Render help overlay
fn render_help_overlay<B: CompletionBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let popup_area = centered_rect_fixed(56, 28, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            " Agile Sprint Planning - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Board:"),
        Line::from("  h/l or ←/→     Move between columns"),
        Line::from("  Tab/Shift+Tab  Cycle columns"),
        Line::from("  j/k or ↑/↓     Move between cards"),
        Line::from(""),
        heading("Cards:"),
        Line::from("  a              Add a requirement"),
        Line::from("  Enter or o     Open details / edit"),
        Line::from("  d or Del       Delete the card"),
        Line::from("  g              Requirement → epic, epic → stories,"),
        Line::from("                 story → tasks"),
        Line::from("  s or Space     Select a task (highlights its parents)"),
        Line::from("  Esc            Clear the selection"),
        Line::from(""),
        heading("Dialogs:"),
        Line::from("  Ctrl+S         Save"),
        Line::from("  Esc            Cancel"),
        Line::from(""),
        heading("Commands:"),
        Line::from("  :add <text>    Add a requirement"),
        Line::from("  :help          Toggle this help"),
        Line::from("  :q             Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{Board, BoardConfig, MockBackend};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn draw(app: &App<Arc<MockBackend>>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn app() -> App<Arc<MockBackend>> {
        App::new(Board::new(Arc::new(MockBackend::new()), BoardConfig::new()))
    }

    #[test]
    fn test_renders_all_columns() {
        let mut app = app();
        app.add_requirement("Customers can pay by card");
        let screen = draw(&app);
        assert!(screen.contains("Agile Sprint Planning"));
        for kind in ArtifactKind::ALL {
            assert!(screen.contains(kind.column_title()), "missing {kind}");
        }
        assert!(screen.contains("Customers can pay by card"));
    }

    #[test]
    fn test_overlays_render() {
        let mut app = app();
        app.toggle_help();
        assert!(draw(&app).contains("Select a task"));

        app.close_overlay();
        app.open_add_requirement();
        assert!(draw(&app).contains("Add Requirement"));
    }
}
