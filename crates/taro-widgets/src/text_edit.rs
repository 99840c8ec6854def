//! Single-line edit buffer with a caret, used by the combobox input.

/// Character buffer and caret position (a char index, 0..=len).
#[derive(Debug, Clone, Default)]
pub(crate) struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl EditBuffer {
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the text and put the caret at the end.
    pub fn set_value(&mut self, s: &str) {
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Backspace. Returns whether anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete. Returns whether anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    /// Ctrl+W: delete the word before the caret and the spaces after it.
    pub fn delete_word_back(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor > 0 && self.chars[self.cursor - 1] == ' ' {
            self.cursor -= 1;
        }
        while self.cursor > 0 && self.chars[self.cursor - 1] != ' ' {
            self.cursor -= 1;
        }
        self.chars.drain(self.cursor..start);
        self.cursor != start
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }
}
