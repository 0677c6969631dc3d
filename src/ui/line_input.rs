use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which text field a [`LineInput`] is currently bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputField {
    Guess,
    PlayerName(usize),
    StartTime,
    EndTime,
}

impl InputField {
    /// Characters the field accepts while typing.
    fn accepts(self, ch: char) -> bool {
        match self {
            InputField::Guess => ch.is_ascii_digit() || ch == '-',
            InputField::StartTime | InputField::EndTime => ch.is_ascii_digit() || ch == ':',
            InputField::PlayerName(_) => !ch.is_control(),
        }
    }

    fn max_chars(self) -> usize {
        match self {
            InputField::Guess => 4,
            InputField::StartTime | InputField::EndTime => 5,
            InputField::PlayerName(_) => 12,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
    FocusNext,
    FocusPrev,
}

pub struct LineInput {
    field: InputField,
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl LineInput {
    pub fn new(field: InputField, text: &str) -> Self {
        let cursor = text.chars().count();
        Self {
            field,
            text: text.to_string(),
            cursor,
        }
    }

    pub fn field(&self) -> InputField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Tab | KeyCode::Down => return InputResult::FocusNext,
            KeyCode::BackTab | KeyCode::Up => return InputResult::FocusPrev,

            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.chars().count(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_at(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.text.chars().count() {
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.field.accepts(ch) && self.text.chars().count() < self.field.max_chars() {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.insert(byte_offset, ch);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn remove_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}
