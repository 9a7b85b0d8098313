use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputKind {
    /// Any printable character, single line.
    Text,
    /// Like `Text`, Enter inserts a newline.
    Multiline,
    /// Digits and one decimal point.
    Number,
}

/// An append-only text field. The cursor always sits at the end.
#[derive(Clone, Debug)]
pub struct TextInputState {
    pub value: String,
    kind: InputKind,
}

impl TextInputState {
    pub fn new(kind: InputKind) -> Self {
        Self {
            value: String::new(),
            kind,
        }
    }

    pub fn with_value(kind: InputKind, value: &str) -> Self {
        Self {
            value: value.to_string(),
            kind,
        }
    }

    /// Applies an editing key. Returns false for keys the field does not use,
    /// so the caller can treat them as commands.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                if self.accepts(c) {
                    self.value.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            KeyCode::Enter if self.kind == InputKind::Multiline => {
                self.value.push('\n');
                true
            }
            _ => false,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            InputKind::Number => c.is_ascii_digit() || (c == '.' && !self.value.contains('.')),
            InputKind::Text | InputKind::Multiline => !c.is_control(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn get_display_string(&self, editing: bool) -> String {
        format!("{}{}", self.value, if editing { "|" } else { "" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_fields_take_one_decimal_point() {
        let mut input = TextInputState::new(InputKind::Number);
        for key in ['1', 'a', '.', '5', '.', '0'] {
            input.handle_input(KeyCode::Char(key));
        }

        assert_eq!(input.value, "1.50");
    }

    #[test]
    fn enter_is_a_newline_only_in_multiline_fields() {
        let mut multiline = TextInputState::with_value(InputKind::Multiline, "Tea 1 10");
        let mut single = TextInputState::with_value(InputKind::Text, "Tea");

        assert!(multiline.handle_input(KeyCode::Enter));
        assert!(!single.handle_input(KeyCode::Enter));
        assert_eq!(multiline.value, "Tea 1 10\n");
        assert_eq!(single.value, "Tea");
    }

    #[test]
    fn backspace_and_cursor_display() {
        let mut input = TextInputState::with_value(InputKind::Text, "ab");
        input.handle_input(KeyCode::Backspace);

        assert_eq!(input.get_display_string(true), "a|");
        assert_eq!(input.get_display_string(false), "a");
    }
}
