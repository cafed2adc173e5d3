use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Text changed
  Edited,
  /// Cursor moved, text unchanged
  Moved,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Single line text input. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  /// Check if the input is empty
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Clear the input
  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  fn len_chars(&self) -> usize {
    self.buffer.chars().count()
  }

  /// Byte offset of a character position
  fn byte_at(&self, pos: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(pos)
      .map(|(i, _)| i)
      .unwrap_or(self.buffer.len())
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor == 0 {
          return InputResult::Moved;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        InputResult::Edited
      }
      KeyCode::Delete => {
        if self.cursor >= self.len_chars() {
          return InputResult::Moved;
        }
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        InputResult::Edited
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Moved
      }
      KeyCode::Right => {
        if self.cursor < self.len_chars() {
          self.cursor += 1;
        }
        InputResult::Moved
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::End => {
        self.cursor = self.len_chars();
        InputResult::Moved
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.len_chars();
        InputResult::Moved
      }
      KeyCode::Char('u') if ctrl => {
        // Clear line before cursor
        let at = self.byte_at(self.cursor);
        self.buffer.drain(..at);
        self.cursor = 0;
        InputResult::Edited
      }
      KeyCode::Char('w') if ctrl => {
        // Delete word before cursor
        if self.cursor == 0 {
          return InputResult::Moved;
        }
        let at = self.byte_at(self.cursor);
        let start = self.buffer[..at]
          .trim_end()
          .rfind(' ')
          .map(|i| i + 1)
          .unwrap_or(0);
        self.buffer.drain(start..at);
        self.cursor = self.buffer[..start].chars().count();
        InputResult::Edited
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_at(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Edited
      }
      _ => InputResult::NotHandled,
    }
  }

  /// Get cursor position (in characters) for rendering
  pub fn cursor_position(&self) -> usize {
    self.cursor
  }
}
