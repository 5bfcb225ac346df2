//! Terminal-agnostic keyboard input and single-line text editing.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (send, or delete in the list).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor, or delete in the list).
    Delete,
    /// Tab key (cycle focus).
    Tab,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Result of feeding a key to a [`TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// The key does not apply to text editing.
    Ignored,
    /// Only the cursor moved, or a no-op edit at a boundary.
    Moved,
    /// The text changed.
    Changed,
}

/// Single-line text field.
///
/// The cursor counts characters, not bytes, so multibyte input edits cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    /// Field holding `text` with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clear the field and return what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Apply an editing key.
    pub fn handle_key(&mut self, key: KeyInput) -> Edit {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                Edit::Changed
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return Edit::Moved;
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                Edit::Changed
            },
            KeyInput::Delete => {
                if self.cursor >= self.char_count() {
                    return Edit::Moved;
                }
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                Edit::Changed
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Edit::Moved
            },
            KeyInput::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                Edit::Moved
            },
            KeyInput::Home => {
                self.cursor = 0;
                Edit::Moved
            },
            KeyInput::End => {
                self.cursor = self.char_count();
                Edit::Moved
            },
            KeyInput::Enter | KeyInput::Tab | KeyInput::Esc | KeyInput::Up | KeyInput::Down => {
                Edit::Ignored
            },
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text.char_indices().nth(chars).map_or(self.text.len(), |(i, _)| i)
    }
}
