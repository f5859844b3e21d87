/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// The question being typed, with a cursor measured in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the whole buffer; the cursor moves to the end
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut input = InputBuffer::new();
        input.set("Wo ist");
        input.move_home();
        input.insert('>');
        assert_eq!(input.text(), ">Wo ist");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputBuffer::new();
        input.set("Grüße");
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.text(), "Grße");
        input.delete();
        assert_eq!(input.text(), "Gre");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut input = InputBuffer::new();
        input.move_left();
        input.backspace();
        input.delete();
        assert_eq!(input.cursor(), 0);

        input.set("ab");
        input.move_right();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_blank_detection() {
        let mut input = InputBuffer::new();
        assert!(input.is_blank());
        input.set("   ");
        assert!(input.is_blank());
        input.set(" x ");
        assert!(!input.is_blank());
        input.clear();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }
}
