use super::search_input::{SearchEvent, SearchInput};
use super::KeyResult;
use crate::error::Result;
use crate::selection::accessor::ItemAccessor;
use crate::selection::SelectionController;
use crate::ui::options::MultiSelectOptions;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Rows taken by the selected-items box
const SELECTED_BOX_HEIGHT: u16 = 3;

/// Events emitted by the multi-select that parent may react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelectEvent {
  Opened,
  Closed,
  /// An item was toggled from the dropdown
  Toggled { label: String, selected: bool },
  /// A selected item was removed from the selected box
  Removed { label: String },
  /// Search text changed
  FilterChanged(String),
}

/// Searchable multi-select dropdown.
///
/// Closed, it shows the selected items as chips which can be focused with
/// Left/Right and removed with Backspace/Delete. Open, it lists the filtered
/// items with checkboxes; Enter toggles the highlighted one.
pub struct MultiSelect<T, A: ItemAccessor<T>> {
  controller: SelectionController<T, A>,
  options: MultiSelectOptions,
  accent: Color,
  search: SearchInput,
  /// Row in the filtered view
  highlighted: usize,
  /// Chip in the selection, used while closed
  focused_chip: usize,
}

impl<T: Clone, A: ItemAccessor<T>> MultiSelect<T, A> {
  pub fn new(accessor: A, options: MultiSelectOptions) -> Result<Self> {
    options.validate()?;
    let accent = options.accent()?;

    Ok(Self {
      controller: SelectionController::new(accessor),
      search: SearchInput::new(options.placeholder.clone()),
      options,
      accent,
      highlighted: 0,
      focused_chip: 0,
    })
  }

  pub fn controller(&self) -> &SelectionController<T, A> {
    &self.controller
  }

  pub fn controller_mut(&mut self) -> &mut SelectionController<T, A> {
    &mut self.controller
  }

  /// Supply items, see [`SelectionController::configure`]
  pub fn set_items(&mut self, items: Vec<T>) -> Result<bool> {
    let replaced = self.controller.configure(items)?;
    if replaced {
      self.highlighted = 0;
    }
    Ok(replaced)
  }

  pub fn highlighted(&self) -> usize {
    self.highlighted
  }

  /// Focused chip, clamped to the current selection
  pub fn focused_chip(&self) -> Option<usize> {
    let len = self.controller.selection().len();
    if len == 0 {
      None
    } else {
      Some(self.focused_chip.min(len - 1))
    }
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> Result<KeyResult<MultiSelectEvent>> {
    if self.controller.is_open() {
      self.handle_open_key(key)
    } else {
      self.handle_closed_key(key)
    }
  }

  fn handle_closed_key(&mut self, key: KeyEvent) -> Result<KeyResult<MultiSelectEvent>> {
    match key.code {
      KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
        self.controller.toggle_open();
        Ok(KeyResult::Event(MultiSelectEvent::Opened))
      }
      KeyCode::Left => {
        self.focused_chip = self.focused_chip().unwrap_or(0).saturating_sub(1);
        Ok(KeyResult::Handled)
      }
      KeyCode::Right => {
        if let Some(chip) = self.focused_chip() {
          let last = self.controller.selection().len() - 1;
          self.focused_chip = (chip + 1).min(last);
        }
        Ok(KeyResult::Handled)
      }
      KeyCode::Backspace | KeyCode::Delete => {
        let Some(chip) = self.focused_chip() else {
          return Ok(KeyResult::Handled);
        };
        let item = &self.controller.selection()[chip];
        let accessor = self.controller.accessor();
        let (key, label) = (accessor.key(item), accessor.label(item));

        self.controller.remove_by_key(&key)?;
        Ok(KeyResult::Event(MultiSelectEvent::Removed { label }))
      }
      _ => Ok(KeyResult::NotHandled),
    }
  }

  fn handle_open_key(&mut self, key: KeyEvent) -> Result<KeyResult<MultiSelectEvent>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc if !self.search.query().is_empty() => {
        self.search.clear();
        self.controller.clear_filter();
        self.clamp_highlight();
        Ok(KeyResult::Event(MultiSelectEvent::FilterChanged(String::new())))
      }
      KeyCode::Esc | KeyCode::Tab => {
        self.controller.toggle_open();
        Ok(KeyResult::Event(MultiSelectEvent::Closed))
      }
      KeyCode::Up => Ok(self.move_highlight(-1)),
      KeyCode::Down => Ok(self.move_highlight(1)),
      KeyCode::Char('p') if ctrl => Ok(self.move_highlight(-1)),
      KeyCode::Char('n') if ctrl => Ok(self.move_highlight(1)),
      KeyCode::Enter => self.toggle_highlighted(),
      KeyCode::Char(' ') if !self.options.can_search => self.toggle_highlighted(),
      _ if self.options.can_search => {
        let result = self.search.handle_key(key).map(|SearchEvent::Changed(query)| {
          MultiSelectEvent::FilterChanged(query)
        });
        if let KeyResult::Event(MultiSelectEvent::FilterChanged(query)) = &result {
          self.controller.apply_filter(query);
          self.clamp_highlight();
        }
        Ok(result)
      }
      _ => Ok(KeyResult::NotHandled),
    }
  }

  fn toggle_highlighted(&mut self) -> Result<KeyResult<MultiSelectEvent>> {
    let label = self
      .controller
      .filtered_get(self.highlighted)
      .map(|item| self.controller.accessor().label(item))
      .unwrap_or_default();

    let selected = self.controller.toggle_filtered(self.highlighted)?;
    Ok(KeyResult::Event(MultiSelectEvent::Toggled { label, selected }))
  }

  fn move_highlight(&mut self, delta: i32) -> KeyResult<MultiSelectEvent> {
    let len = self.controller.filtered_len();
    if len > 0 {
      self.highlighted = (self.highlighted as i32 + delta).rem_euclid(len as i32) as usize;
    }
    KeyResult::Handled
  }

  fn clamp_highlight(&mut self) {
    let len = self.controller.filtered_len();
    self.highlighted = self.highlighted.min(len.saturating_sub(1));
  }

  /// Rows the widget wants, including the dropdown when open
  pub fn desired_height(&self) -> u16 {
    if !self.controller.is_open() {
      return SELECTED_BOX_HEIGHT;
    }
    SELECTED_BOX_HEIGHT.saturating_add(self.dropdown_height())
  }

  fn dropdown_height(&self) -> u16 {
    if let Some(height) = self.options.height {
      return height;
    }
    let search_row = u16::from(self.options.can_search);
    let rows = u16::try_from(self.controller.filtered_len().max(1)).unwrap_or(u16::MAX);
    rows.saturating_add(search_row + 2)
  }

  /// Render the widget at the top-left of `area`
  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let width = self.options.width.min(area.width);
    if width == 0 || area.height < SELECTED_BOX_HEIGHT {
      return;
    }

    let selected_area = Rect::new(area.x, area.y, width, SELECTED_BOX_HEIGHT);
    self.render_selected(frame, selected_area);

    if self.controller.is_open() {
      let available = area.height - SELECTED_BOX_HEIGHT;
      let height = self.dropdown_height().min(available);
      if height >= 3 {
        let dropdown_area = Rect::new(area.x, area.y + SELECTED_BOX_HEIGHT, width, height);
        self.render_dropdown(frame, dropdown_area);
      }
    }
  }

  fn render_selected(&self, frame: &mut Frame, area: Rect) {
    let selection = self.controller.selection();
    let arrow = if self.controller.is_open() { "▴" } else { "▾" };

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(self.accent))
      .title(format!(" Selected ({}) {} ", selection.len(), arrow));

    let line = if selection.is_empty() {
      Line::from(Span::styled(
        "Nothing selected",
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      let focused = if self.controller.is_open() {
        None
      } else {
        self.focused_chip()
      };
      let accessor = self.controller.accessor();
      let mut spans = Vec::with_capacity(selection.len() * 2);
      for (i, item) in selection.iter().enumerate() {
        let style = if Some(i) == focused {
          Style::default().bg(self.accent).fg(Color::Black)
        } else {
          Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} ", accessor.label(item)), style));
        spans.push(Span::raw(" "));
      }
      Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }

  fn render_dropdown(&self, frame: &mut Frame, area: Rect) {
    // Clear the area behind the dropdown
    frame.render_widget(Clear, area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(self.accent));

    let mut inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
      return;
    }

    if self.options.can_search {
      let search_area = Rect::new(inner.x, inner.y, inner.width, 1);
      frame.render_widget(
        Paragraph::new(self.search.line(true, self.accent)),
        search_area,
      );
      inner.y += 1;
      inner.height -= 1;
      if inner.height == 0 {
        return;
      }
    }

    if self.controller.filtered_len() == 0 {
      let empty = Paragraph::new(Span::styled(
        "No matches",
        Style::default().fg(Color::DarkGray),
      ));
      frame.render_widget(empty, inner);
      return;
    }

    let accessor = self.controller.accessor();
    let items: Vec<ListItem> = self
      .controller
      .filtered()
      .into_iter()
      .map(|item| {
        let (mark, style) = if self.controller.is_selected(item) {
          ("[x] ", Style::default().fg(Color::Green))
        } else {
          ("[ ] ", Style::default().fg(Color::Cyan))
        };
        ListItem::new(Line::from(vec![
          Span::styled(mark, style),
          Span::raw(accessor.label(item)),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.highlighted));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
