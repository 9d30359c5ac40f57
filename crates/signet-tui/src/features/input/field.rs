//! Single-line text field used by the auth form.
//!
//! Supports the editing subset a username/password box needs: insert,
//! delete, cursor movement, and paste. Newlines in pasted text are dropped.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    /// Cursor position in chars.
    cursor: usize,
}

impl TextField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display columns before the cursor. With `mask`, every char counts as
    /// one column.
    pub fn cursor_column(&self, mask: bool) -> usize {
        if mask {
            return self.cursor;
        }
        self.text
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = single_line(text);
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_str(&mut self, text: &str) {
        let text = single_line(text);
        if text.is_empty() {
            return;
        }
        let idx = self.byte_index(self.cursor);
        self.text.insert_str(idx, &text);
        self.cursor += text.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    pub fn delete_prev_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_index(self.cursor - 1);
        let end = self.byte_index(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete_next_char(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    /// Handles a key input for basic editing.
    ///
    /// Returns true if the key was consumed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if matches!(key.kind, KeyEventKind::Release) {
            return false;
        }

        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_len(),
            _ => return false,
        }
        true
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

fn single_line(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::default();
        for c in "alicex".chars() {
            field.input(key(KeyCode::Char(c)));
        }
        field.input(key(KeyCode::Backspace));

        assert_eq!(field.text(), "alice");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn test_cursor_movement_and_insert() {
        let mut field = TextField::default();
        field.set_text("ace");
        field.input(key(KeyCode::Left));
        field.input(key(KeyCode::Left));
        field.input(key(KeyCode::Char('l')));
        field.input(key(KeyCode::Char('i')));

        assert_eq!(field.text(), "alice");

        field.input(key(KeyCode::Home));
        field.input(key(KeyCode::Delete));
        assert_eq!(field.text(), "lice");

        field.input(key(KeyCode::End));
        field.input(key(KeyCode::Right));
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn test_multibyte_text() {
        let mut field = TextField::default();
        field.insert_str("名前");
        field.input(key(KeyCode::Left));
        field.input(key(KeyCode::Backspace));

        assert_eq!(field.text(), "前");
        assert_eq!(field.cursor_column(false), 0);

        field.input(key(KeyCode::End));
        assert_eq!(field.cursor_column(false), 2);
        assert_eq!(field.cursor_column(true), 1);
    }

    #[test]
    fn test_paste_drops_newlines() {
        let mut field = TextField::default();
        field.insert_str("bob\r\nsmith\n");

        assert_eq!(field.text(), "bobsmith");
        assert_eq!(field.cursor(), 8);
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        let mut field = TextField::default();
        field.set_text("abc");

        let consumed = field.input(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert!(!consumed);
        assert_eq!(field.text(), "abc");

        field.input(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(field.is_empty());
    }
}
