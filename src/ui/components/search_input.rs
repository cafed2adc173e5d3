use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Search query changed (emitted on each edit)
  Changed(String),
}

/// Search line shown at the top of the dropdown
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  placeholder: String,
}

impl SearchInput {
  pub fn new(placeholder: impl Into<String>) -> Self {
    Self {
      input: TextInput::new(),
      placeholder: placeholder.into(),
    }
  }

  /// Get the current search query
  pub fn query(&self) -> &str {
    self.input.value()
  }

  pub fn clear(&mut self) {
    self.input.clear();
  }

  /// Handle an editing key.
  /// Enter and Esc are left to the parent.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    match self.input.handle_key(key) {
      InputResult::Edited => KeyResult::Event(SearchEvent::Changed(self.input.value().to_string())),
      InputResult::Moved => KeyResult::Handled,
      InputResult::Submitted(_) | InputResult::Cancelled | InputResult::NotHandled => {
        KeyResult::NotHandled
      }
    }
  }

  /// Build the search line, with a block cursor when focused
  pub fn line(&self, focused: bool, accent: Color) -> Line<'_> {
    let prompt = Span::styled("/ ", Style::default().fg(accent));

    if self.input.is_empty() && !focused {
      return Line::from(vec![
        prompt,
        Span::styled(self.placeholder.as_str(), Style::default().fg(Color::DarkGray)),
      ]);
    }

    let value = self.input.value();
    let split = value
      .char_indices()
      .nth(self.input.cursor_position())
      .map(|(i, _)| i)
      .unwrap_or(value.len());
    let (before, rest) = value.split_at(split);

    let mut spans = vec![prompt, Span::raw(before)];
    if focused {
      let mut chars = rest.chars();
      let under = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
      spans.push(Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)));
      spans.push(Span::raw(chars.as_str()));
    } else {
      spans.push(Span::raw(rest));
    }

    if self.input.is_empty() {
      spans.push(Span::styled(self.placeholder.as_str(), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
  }
}
