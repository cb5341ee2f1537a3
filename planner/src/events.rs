//! Event handling for the planning board TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use planner_core::CompletionBackend;

use crate::app::{App, InputMode, Overlay};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event<B: CompletionBackend>(app: &mut App<B>, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event<B: CompletionBackend>(app: &mut App<B>, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // Handle overlay keys first
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        // Insert mode only exists inside a dialog
        InputMode::Insert => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }
    }
}

/// Handle keys in NORMAL mode (board navigation and hotkeys)
fn handle_normal_mode<B: CompletionBackend>(app: &mut App<B>, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char('q') => return EventResult::Quit,

        // Columns
        KeyCode::Char('h') | KeyCode::Left => app.focus_left(),
        KeyCode::Char('l') | KeyCode::Right => app.focus_right(),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::BackTab => app.cycle_focus_reverse(),

        // Cards
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),

        // Actions
        KeyCode::Char('a') => app.open_add_requirement(),
        KeyCode::Enter | KeyCode::Char('o') => app.open_details(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_current(),
        KeyCode::Char('g') => app.request_generation(),
        KeyCode::Char('s') | KeyCode::Char(' ') => app.select_current(),
        KeyCode::Esc => app.clear_selection(),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys in COMMAND mode (: commands)
fn handle_command_mode<B: CompletionBackend>(app: &mut App<B>, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => app.enter_normal_mode(),

        KeyCode::Enter => {
            let command = app.input_buffer().to_string();
            app.enter_normal_mode();
            app.process_command(&command);
            if app.should_quit {
                return EventResult::Quit;
            }
        }

        KeyCode::Left => {
            if app.cursor_position() > 1 {
                app.cursor_left();
            }
        }
        KeyCode::Right => app.cursor_right(),
        KeyCode::Backspace => {
            if app.cursor_position() > 1 {
                app.backspace();
            } else {
                // Backspace on just ":" exits command mode
                app.enter_normal_mode();
            }
        }

        KeyCode::Char(c) => app.type_char(c),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle key when overlay is open
fn handle_overlay_key<B: CompletionBackend>(app: &mut App<B>, key: KeyEvent) -> EventResult {
    if matches!(app.overlay(), Some(Overlay::Help)) {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
                app.close_overlay();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        };
    }
    handle_editor_key(app, key)
}

/// Handle keys inside the multi-line editor dialog
fn handle_editor_key<B: CompletionBackend>(app: &mut App<B>, key: KeyEvent) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => {
                app.save_editor();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        };
    }

    if key.code == KeyCode::Esc {
        app.cancel_editor();
        return EventResult::NeedsRedraw;
    }

    let Some(editor) = app.editor_mut() else {
        return EventResult::Continue;
    };
    match key.code {
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.left(),
        KeyCode::Right => editor.right(),
        KeyCode::Up => editor.up(),
        KeyCode::Down => editor.down(),
        KeyCode::Home => editor.home(),
        KeyCode::End => editor.end(),
        KeyCode::Tab => {
            for _ in 0..4 {
                editor.insert_char(' ');
            }
        }
        KeyCode::Char(c) => editor.insert_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{ArtifactKind, Board, BoardConfig, Card, MockBackend};
    use std::sync::Arc;

    fn app() -> App<Arc<MockBackend>> {
        App::new(Board::new(Arc::new(MockBackend::new()), BoardConfig::new()))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text<B: CompletionBackend>(app: &mut App<B>, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('q'))), EventResult::Quit);
        assert_eq!(handle_event(&mut app, ctrl('c')), EventResult::Quit);
    }

    #[test]
    fn test_add_requirement_flow() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.input_mode, InputMode::Insert);

        // 'q' and 'd' are text inside the dialog, not hotkeys.
        type_text(&mut app, "quick add");
        handle_event(&mut app, key(KeyCode::Enter));
        type_text(&mut app, "second line");
        handle_event(&mut app, ctrl('s'));

        assert!(!app.has_overlay());
        assert_eq!(
            app.board.store().requirements()[0].text(),
            "quick add\nsecond line"
        );
    }

    #[test]
    fn test_escape_cancels_editor() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "draft");
        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.has_overlay());
        assert!(app.board.store().is_empty());
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.focused_column(), ArtifactKind::Epic);
        handle_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.focused_column(), ArtifactKind::Story);
        handle_event(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.focused_column(), ArtifactKind::Epic);
        handle_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.focused_column(), ArtifactKind::Requirement);
    }

    #[test]
    fn test_delete_key() {
        let mut app = app();
        app.add_requirement("one");
        handle_event(&mut app, key(KeyCode::Char('d')));
        assert!(app.board.store().is_empty());
    }

    #[test]
    fn test_generate_key_queues_intent() {
        let mut app = app();
        app.add_requirement("one");
        handle_event(&mut app, key(KeyCode::Char('g')));
        assert!(app.has_pending());
    }

    #[test]
    fn test_command_mode() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char(':')));
        assert_eq!(app.input_mode, InputMode::Command);
        type_text(&mut app, "add From the command line");
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.board.store().requirements()[0].text(),
            "From the command line"
        );

        handle_event(&mut app, key(KeyCode::Char(':')));
        handle_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_event(&mut app, key(KeyCode::Char(':')));
        type_text(&mut app, "q");
        assert_eq!(handle_event(&mut app, key(KeyCode::Enter)), EventResult::Quit);
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('?')));
        assert!(matches!(app.overlay(), Some(Overlay::Help)));
        // Keys do not leak through to the board.
        handle_event(&mut app, key(KeyCode::Char('a')));
        assert!(matches!(app.overlay(), Some(Overlay::Help)));
        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.has_overlay());
    }
}
