//! Main application state and logic

use planner_core::{
    ArtifactId, ArtifactKind, Board, BoardView, CompletionBackend, Intent, Outcome,
};

use crate::editor::TextEditor;
use crate::ui::theme::BoardTheme;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing in a dialog
    Insert,
    /// Command mode - entering : commands
    Command,
}

/// What a dialog's text is saved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    NewRequirement,
    Card { kind: ArtifactKind, id: ArtifactId },
}

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
    Editor {
        target: EditTarget,
        editor: TextEditor,
    },
}

/// Status line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App<B> {
    pub board: Board<B>,
    pub theme: BoardTheme,

    // Board navigation
    focused: ArtifactKind,
    cursors: [usize; 4],
    overlay: Option<Overlay>,

    // Command line
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    status: Option<Status>,
    pub should_quit: bool,

    // Generation waiting for the main loop
    pending: Option<Intent>,
}

impl<B: CompletionBackend> App<B> {
    pub fn new(board: Board<B>) -> Self {
        let mut app = Self {
            board,
            theme: BoardTheme::default(),
            focused: ArtifactKind::Requirement,
            cursors: [0; 4],
            overlay: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            status: None,
            should_quit: false,
            pending: None,
        };
        app.set_status("Press 'a' to add a requirement, '?' for help");
        app
    }

    // =========================================================================
    // Board navigation
    // =========================================================================

    pub fn focused_column(&self) -> ArtifactKind {
        self.focused
    }

    /// Cursor index inside a column.
    pub fn cursor(&self, kind: ArtifactKind) -> usize {
        self.cursors[kind.column_index()]
    }

    pub fn focus(&mut self, kind: ArtifactKind) {
        self.focused = kind;
        self.clamp_cursor(kind);
    }

    pub fn focus_left(&mut self) {
        let idx = self.focused.column_index();
        if idx > 0 {
            self.focus(ArtifactKind::ALL[idx - 1]);
        }
    }

    pub fn focus_right(&mut self) {
        let idx = self.focused.column_index();
        if idx + 1 < ArtifactKind::ALL.len() {
            self.focus(ArtifactKind::ALL[idx + 1]);
        }
    }

    /// Cycle to next column, wrapping around
    pub fn cycle_focus(&mut self) {
        let idx = (self.focused.column_index() + 1) % ArtifactKind::ALL.len();
        self.focus(ArtifactKind::ALL[idx]);
    }

    /// Cycle to previous column, wrapping around
    pub fn cycle_focus_reverse(&mut self) {
        let n = ArtifactKind::ALL.len();
        let idx = (self.focused.column_index() + n - 1) % n;
        self.focus(ArtifactKind::ALL[idx]);
    }

    pub fn cursor_down(&mut self) {
        let kind = self.focused;
        let len = self.board.store().len(kind);
        let cursor = &mut self.cursors[kind.column_index()];
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        let cursor = &mut self.cursors[self.focused.column_index()];
        *cursor = cursor.saturating_sub(1);
    }

    fn clamp_cursor(&mut self, kind: ArtifactKind) {
        let len = self.board.store().len(kind);
        let cursor = &mut self.cursors[kind.column_index()];
        *cursor = (*cursor).min(len.saturating_sub(1));
    }

    fn move_cursor_to(&mut self, kind: ArtifactKind, id: ArtifactId) {
        if let Some(pos) = self.board.store().ids(kind).iter().position(|i| *i == id) {
            self.cursors[kind.column_index()] = pos;
        }
    }

    /// Card under the cursor in the focused column.
    pub fn current_card(&self) -> Option<(ArtifactKind, ArtifactId)> {
        let kind = self.focused;
        self.board
            .store()
            .ids(kind)
            .get(self.cursor(kind))
            .map(|id| (kind, *id))
    }

    pub fn view(&self) -> BoardView {
        self.board.view()
    }

    // =========================================================================
    // Card actions
    // =========================================================================

    /// Open the Add Requirement dialog
    pub fn open_add_requirement(&mut self) {
        self.open_editor(EditTarget::NewRequirement, TextEditor::default());
    }

    /// Open the Details dialog for the card under the cursor
    pub fn open_details(&mut self) {
        let Some((kind, id)) = self.current_card() else {
            self.set_status("No card selected");
            return;
        };
        let text = self
            .board
            .store()
            .find_by_id(kind, id)
            .map(|card| card.text().to_string())
            .unwrap_or_default();
        self.open_editor(EditTarget::Card { kind, id }, TextEditor::new(text));
    }

    fn open_editor(&mut self, target: EditTarget, editor: TextEditor) {
        self.overlay = Some(Overlay::Editor { target, editor });
        self.input_mode = InputMode::Insert;
    }

    /// Mutable access to the open editor, if any
    pub fn editor_mut(&mut self) -> Option<&mut TextEditor> {
        match &mut self.overlay {
            Some(Overlay::Editor { editor, .. }) => Some(editor),
            _ => None,
        }
    }

    /// Save the open dialog and close it
    pub fn save_editor(&mut self) {
        let Some(Overlay::Editor { target, editor }) = self.overlay.take() else {
            return;
        };
        self.input_mode = InputMode::Normal;

        match target {
            EditTarget::NewRequirement => self.add_requirement(editor.text()),
            EditTarget::Card { kind, id } => {
                if self.board.edit(kind, id, editor.into_text()) {
                    self.set_status(format!("Saved {kind} #{id}"));
                } else {
                    self.set_error(format!("{kind} #{id} no longer exists"));
                }
            }
        }
    }

    /// Close the open dialog without saving
    pub fn cancel_editor(&mut self) {
        if matches!(self.overlay, Some(Overlay::Editor { .. })) {
            self.overlay = None;
            self.input_mode = InputMode::Normal;
            self.set_status("Cancelled");
        }
    }

    pub fn add_requirement(&mut self, text: &str) {
        match self.board.add_requirement(text) {
            Some(id) => {
                self.focus(ArtifactKind::Requirement);
                self.move_cursor_to(ArtifactKind::Requirement, id);
                self.set_status(format!("Added requirement #{id}"));
            }
            None => self.set_status("Empty requirement ignored"),
        }
    }

    /// Delete the card under the cursor
    pub fn delete_current(&mut self) {
        let Some((kind, id)) = self.current_card() else {
            self.set_status("Nothing to delete");
            return;
        };
        if self.board.delete(kind, id) {
            self.set_status(format!("Deleted {kind} #{id}"));
        }
        self.clamp_cursor(kind);
    }

    /// Queue the focused column's generation step for the card under the cursor
    pub fn request_generation(&mut self) {
        let Some((kind, id)) = self.current_card() else {
            self.set_status("No card selected");
            return;
        };
        let intent = match kind {
            ArtifactKind::Requirement => Intent::ConvertToEpic { requirement_id: id },
            ArtifactKind::Epic => Intent::ExpandEpic { epic_id: id },
            ArtifactKind::Story => Intent::BreakStory { story_id: id },
            ArtifactKind::Task => {
                self.set_status("Tasks are the last step; press s to select one");
                return;
            }
        };
        self.set_status(format!("Generating… {}", generation_label(&intent)));
        self.pending = Some(intent);
    }

    pub fn take_pending(&mut self) -> Option<Intent> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply an intent and report the outcome in the status bar
    pub async fn run_intent(&mut self, intent: Intent) {
        let creates = intent.creates();
        let label = generation_label(&intent);
        match self.board.apply(intent).await {
            Ok(Outcome::Created(ids)) => {
                if let (Some(kind), Some(first)) = (creates, ids.first()) {
                    self.move_cursor_to(kind, *first);
                    self.set_status(format!("Created {} {}", ids.len(), noun(kind, ids.len())));
                }
            }
            Ok(Outcome::Updated) => self.set_status("Done"),
            Ok(Outcome::Unchanged) => self.set_status(format!("Nothing generated for {label}")),
            Err(e) => self.set_error(format!("Generation failed: {e}")),
        }
    }

    /// Select the task under the cursor for highlighting
    pub fn select_current(&mut self) {
        match self.current_card() {
            Some((ArtifactKind::Task, id)) => {
                if self.board.select_task(id) {
                    self.set_status(format!("Selected task #{id}"));
                }
            }
            Some(_) => self.set_status("Only tasks can be selected"),
            None => self.set_status("No card selected"),
        }
    }

    pub fn clear_selection(&mut self) {
        if self.board.selection().is_some() {
            self.board.clear_selection();
            self.set_status("Selection cleared");
        }
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    /// Close any open overlay
    pub fn close_overlay(&mut self) {
        self.overlay = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    // =========================================================================
    // Command line
    // =========================================================================

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.clear_input();
    }

    /// Process a colon command
    pub fn process_command(&mut self, command: &str) {
        let cmd = command.trim_start_matches(':').trim();
        let (name, rest) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));

        match name {
            "" => {}
            "q" | "quit" | "exit" => self.should_quit = true,
            "help" | "h" => self.toggle_help(),
            "add" | "a" => {
                if rest.trim().is_empty() {
                    self.set_status("Usage: :add <requirement text>");
                } else {
                    self.add_requirement(rest);
                }
            }
            other => self.set_error(format!("Unknown command: {other}")),
        }
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    /// Get the current input buffer
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Get the current cursor position
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            text: message.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            text: message.into(),
            is_error: true,
        });
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }
}

fn noun(kind: ArtifactKind, count: usize) -> &'static str {
    match (kind, count) {
        (ArtifactKind::Requirement, 1) => "requirement",
        (ArtifactKind::Requirement, _) => "requirements",
        (ArtifactKind::Epic, 1) => "epic",
        (ArtifactKind::Epic, _) => "epics",
        (ArtifactKind::Story, 1) => "user story",
        (ArtifactKind::Story, _) => "user stories",
        (ArtifactKind::Task, 1) => "task",
        (ArtifactKind::Task, _) => "tasks",
    }
}

/// Short human label for a generation intent.
pub fn generation_label(intent: &Intent) -> String {
    match intent {
        Intent::ConvertToEpic { requirement_id } => {
            format!("epic from requirement #{requirement_id}")
        }
        Intent::ExpandEpic { epic_id } => format!("user stories for epic #{epic_id}"),
        Intent::BreakStory { story_id } => format!("tasks for story #{story_id}"),
        Intent::AddRequirement { .. } => "new requirement".to_string(),
        Intent::Edit { kind, id, .. } => format!("edit of {kind} #{id}"),
        Intent::Delete { kind, id } => format!("deletion of {kind} #{id}"),
        Intent::SelectTask { task_id } => format!("selection of task #{task_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::pipeline::TASK_DELIMITER;
    use planner_core::{BoardConfig, Card, MockBackend};
    use std::sync::Arc;

    fn app_with(backend: Arc<MockBackend>) -> App<Arc<MockBackend>> {
        App::new(Board::new(backend, BoardConfig::new().with_model("mock")))
    }

    #[test]
    fn test_focus_movement() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.focus_left();
        assert_eq!(app.focused_column(), ArtifactKind::Requirement);
        app.focus_right();
        app.focus_right();
        app.focus_right();
        app.focus_right();
        assert_eq!(app.focused_column(), ArtifactKind::Task);
        app.cycle_focus();
        assert_eq!(app.focused_column(), ArtifactKind::Requirement);
        app.cycle_focus_reverse();
        assert_eq!(app.focused_column(), ArtifactKind::Task);
    }

    #[test]
    fn test_cursor_stays_in_column() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.add_requirement("one");
        app.add_requirement("two");
        assert_eq!(app.cursor(ArtifactKind::Requirement), 1);
        app.cursor_down();
        assert_eq!(app.cursor(ArtifactKind::Requirement), 1);
        app.cursor_up();
        app.cursor_up();
        assert_eq!(app.cursor(ArtifactKind::Requirement), 0);
        assert_eq!(
            app.current_card(),
            Some((ArtifactKind::Requirement, ArtifactId::from_raw(1)))
        );
    }

    #[test]
    fn test_add_requirement_dialog() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.open_add_requirement();
        assert_eq!(app.input_mode, InputMode::Insert);
        for c in "  Pay by card  ".chars() {
            app.editor_mut().unwrap().insert_char(c);
        }
        app.save_editor();

        assert!(!app.has_overlay());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.board.store().requirements()[0].text(), "Pay by card");
        assert_eq!(app.status().unwrap().text, "Added requirement #1");
    }

    #[test]
    fn test_blank_requirement_ignored() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.open_add_requirement();
        app.editor_mut().unwrap().insert_newline();
        app.save_editor();
        assert!(app.board.store().is_empty());
    }

    #[test]
    fn test_details_edit_saves_text() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.add_requirement("old");
        app.open_details();
        let editor = app.editor_mut().unwrap();
        assert_eq!(editor.text(), "old");
        editor.insert_char('!');
        app.save_editor();
        assert_eq!(app.board.store().requirements()[0].text(), "old!");
    }

    #[test]
    fn test_cancel_keeps_text() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.add_requirement("keep me");
        app.open_details();
        app.editor_mut().unwrap().backspace();
        app.cancel_editor();
        assert_eq!(app.board.store().requirements()[0].text(), "keep me");
    }

    #[test]
    fn test_delete_clamps_cursor() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.add_requirement("one");
        app.add_requirement("two");
        app.delete_current();
        assert_eq!(app.cursor(ArtifactKind::Requirement), 0);
        assert_eq!(app.board.store().len(ArtifactKind::Requirement), 1);
        app.delete_current();
        app.delete_current();
        assert!(app.board.store().is_empty());
        assert_eq!(app.status().unwrap().text, "Nothing to delete");
    }

    #[tokio::test]
    async fn test_generation_runs_through_pending() {
        let backend = Arc::new(
            MockBackend::new()
                .respond("Epic text")
                .respond("# S1\nbody\n<<<SPLIT>>>\n# S2\nbody\n<<<SPLIT>>>")
                .respond(format!("T1\n{TASK_DELIMITER}\nT2\n{TASK_DELIMITER}")),
        );
        let mut app = app_with(Arc::clone(&backend));
        app.add_requirement("Req");

        app.request_generation();
        assert!(app.status().unwrap().text.starts_with("Generating…"));
        let intent = app.take_pending().unwrap();
        app.run_intent(intent).await;
        assert_eq!(app.status().unwrap().text, "Created 1 epic");

        app.focus_right();
        app.request_generation();
        let intent = app.take_pending().unwrap();
        app.run_intent(intent).await;
        assert_eq!(app.board.store().len(ArtifactKind::Story), 2);
        assert_eq!(app.status().unwrap().text, "Created 2 user stories");
        assert_eq!(app.cursor(ArtifactKind::Story), 0);

        app.focus_right();
        app.request_generation();
        let intent = app.take_pending().unwrap();
        app.run_intent(intent).await;
        assert_eq!(app.board.store().len(ArtifactKind::Task), 2);

        app.focus_right();
        app.request_generation();
        assert!(!app.has_pending());
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_generation_failure_sets_error() {
        let backend = Arc::new(MockBackend::new().fail("rate limited"));
        let mut app = app_with(backend);
        app.add_requirement("Req");
        app.request_generation();
        let intent = app.take_pending().unwrap();
        app.run_intent(intent).await;

        let status = app.status().unwrap();
        assert!(status.is_error);
        assert!(status.text.starts_with("Generation failed:"));
        assert!(status.text.contains("rate limited"));
    }

    #[test]
    fn test_select_only_tasks() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.add_requirement("Req");
        app.select_current();
        assert_eq!(app.status().unwrap().text, "Only tasks can be selected");
        assert!(app.board.selection().is_none());
    }

    #[test]
    fn test_commands() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.process_command(":add Users can   log in");
        assert_eq!(app.board.store().requirements()[0].text(), "Users can   log in");

        app.process_command(":add");
        assert_eq!(app.board.store().len(ArtifactKind::Requirement), 1);

        app.process_command(":help");
        assert!(matches!(app.overlay(), Some(Overlay::Help)));

        app.process_command(":bogus");
        assert!(app.status().unwrap().is_error);

        app.process_command(":q");
        assert!(app.should_quit);
    }

    #[test]
    fn test_command_line_editing() {
        let mut app = app_with(Arc::new(MockBackend::new()));
        app.enter_command_mode();
        app.type_char('q');
        assert_eq!(app.input_buffer(), ":q");
        app.backspace();
        assert_eq!(app.input_buffer(), ":");
        app.enter_normal_mode();
        assert_eq!(app.input_buffer(), "");
    }
}
