use unicode_width::UnicodeWidthStr;

/// Editable text with a cursor, counted in chars so multi-byte input is safe.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
    multiline: bool,
}

impl TextField {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string(), cursor: text.chars().count(), multiline: false }
    }

    pub fn multiline(text: &str) -> Self {
        Self { multiline: true, ..Self::new(text) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn insert(&mut self, ch: char) {
        if ch == '\n' && !self.multiline {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Deletes the char before the cursor. Returns false when there was nothing to delete.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = text.chars().count();
    }

    /// Terminal position of the cursor relative to the field origin: (column, row).
    ///
    /// Columns are display cells, so a CJK character advances by two.
    pub fn cursor_position(&self) -> (u16, u16) {
        let before = &self.text[..self.byte_index(self.cursor)];
        let row = before.matches('\n').count();
        let line = before.rsplit('\n').next().unwrap_or("");
        (clamp_u16(line.width()), clamp_u16(row))
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text.char_indices().nth(char_index).map_or(self.text.len(), |(i, _)| i)
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
