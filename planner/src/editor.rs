//! Multi-line text buffer behind the Details and Add Requirement dialogs.
//!
//! The cursor is a character index, so every edit is unicode-safe.

/// Editable text with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditor {
    text: String,
    cursor: usize,
}

impl TextEditor {
    /// Start with `text`, cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    /// Line and column of the cursor, both zero-based.
    pub fn line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for c in self.text.chars().take(self.cursor) {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// Lines of the buffer; a trailing newline yields a final empty line.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    fn line_lengths(&self) -> Vec<usize> {
        self.lines().iter().map(|l| l.chars().count()).collect()
    }

    fn move_to(&mut self, line: usize, col: usize) {
        let lengths = self.line_lengths();
        let line = line.min(lengths.len().saturating_sub(1));
        let before: usize = lengths[..line].iter().map(|len| len + 1).sum();
        self.cursor = before + col.min(lengths.get(line).copied().unwrap_or(0));
    }

    pub fn home(&mut self) {
        let (line, _) = self.line_col();
        self.move_to(line, 0);
    }

    pub fn end(&mut self) {
        let (line, _) = self.line_col();
        self.move_to(line, usize::MAX);
    }

    pub fn up(&mut self) {
        match self.line_col() {
            (0, _) => self.cursor = 0,
            (line, col) => self.move_to(line - 1, col),
        }
    }

    pub fn down(&mut self) {
        let (line, col) = self.line_col();
        if line + 1 >= self.line_lengths().len() {
            self.cursor = self.len();
        } else {
            self.move_to(line + 1, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_newlines() {
        let mut editor = TextEditor::default();
        for c in "ab".chars() {
            editor.insert_char(c);
        }
        editor.insert_newline();
        editor.insert_char('c');
        assert_eq!(editor.text(), "ab\nc");
        assert_eq!(editor.line_col(), (1, 1));
        assert_eq!(editor.lines(), vec!["ab", "c"]);
    }

    #[test]
    fn test_unicode_editing() {
        let mut editor = TextEditor::new("héllo");
        editor.left();
        editor.left();
        editor.left();
        editor.backspace();
        assert_eq!(editor.text(), "hllo");
        editor.insert_char('ë');
        assert_eq!(editor.text(), "hëllo");
        editor.delete();
        assert_eq!(editor.text(), "hëlo");
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let mut editor = TextEditor::new("long line\nab\nthird line");
        assert_eq!(editor.line_col(), (2, 10));
        editor.up();
        assert_eq!(editor.line_col(), (1, 2));
        editor.up();
        assert_eq!(editor.line_col(), (0, 2));
        editor.up();
        assert_eq!(editor.cursor(), 0);
        editor.down();
        editor.down();
        editor.down();
        assert_eq!(editor.cursor(), editor.text().chars().count());
    }

    #[test]
    fn test_home_end_stay_on_line() {
        let mut editor = TextEditor::new("one\ntwo");
        editor.home();
        assert_eq!(editor.line_col(), (1, 0));
        editor.up();
        editor.end();
        assert_eq!(editor.line_col(), (0, 3));
    }

    #[test]
    fn test_edges_are_noops() {
        let mut editor = TextEditor::new("");
        editor.backspace();
        editor.delete();
        editor.left();
        editor.right();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.lines(), vec![""]);
    }
}
