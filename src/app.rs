use crate::event::{Event, EventHandler};
use crate::screen;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use multiselect::{
  ItemAccessor, KeyResult, ListenerError, MultiSelect, MultiSelectEvent, StateChange,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Demo application: a counter next to the multi-select
pub struct App<T, A: ItemAccessor<T>> {
  select: MultiSelect<T, A>,

  /// Clicks counted with `+`
  count: u32,

  /// Labels of the selected items, as last reported by the listener
  selected: Vec<String>,

  /// Message shown in the status bar
  status: Option<String>,

  /// Widget state changes, used to decide when to redraw
  changes: watch::Receiver<StateChange>,

  events: EventHandler,

  /// Whether to quit
  should_quit: bool,
}

impl<T, A> App<T, A>
where
  T: Clone + 'static,
  A: ItemAccessor<T> + Clone + 'static,
{
  pub fn new(mut select: MultiSelect<T, A>) -> Self {
    let events = EventHandler::new();

    // Report selection changes through the event stream
    let tx = events.sender();
    let accessor = select.controller().accessor().clone();
    select
      .controller_mut()
      .on_selection_changed(move |selected: &[T]| {
        let labels = selected.iter().map(|item| accessor.label(item)).collect();
        tx.send(Event::SelectionChanged(labels))
          .map_err(|e| Box::new(e) as ListenerError)
      });

    let changes = select.controller().subscribe();

    Self {
      select,
      count: 0,
      selected: Vec::new(),
      status: None,
      changes,
      events,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    self.events.start(Duration::from_millis(250));

    // Main loop
    let mut dirty = true;
    while !self.should_quit {
      if dirty || self.changes.has_changed().unwrap_or(false) {
        let revision = self.changes.borrow_and_update().revision;
        debug!(revision, "Redrawing");
        terminal.draw(|frame| screen::draw(frame, self))?;
      }

      // Handle events
      match self.events.next().await {
        Some(event) => dirty = self.handle_event(event),
        None => break,
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  /// Handle one event. Returns whether app-level state changed.
  fn handle_event(&mut self, event: Event) -> bool {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => false,
      Event::SelectionChanged(labels) => {
        info!("Selected items: {}", labels.join(", "));
        self.selected = labels;
        true
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return true;
    }

    // Keys for the app only apply while the dropdown is closed
    if !self.select.controller().is_open() {
      match key.code {
        KeyCode::Char('q') => {
          self.should_quit = true;
          return true;
        }
        KeyCode::Char('+') => {
          self.count += 1;
          return true;
        }
        _ => {}
      }
    }

    match self.select.handle_key(key) {
      Ok(result) => {
        if let KeyResult::Event(event) = &result {
          self.status = Some(describe(event));
        }
        result.is_handled()
      }
      Err(e) => {
        warn!("Multi-select error: {}", e);
        self.status = Some(e.to_string());
        true
      }
    }
  }

  // Accessors for UI rendering

  pub fn select(&self) -> &MultiSelect<T, A> {
    &self.select
  }

  pub fn count(&self) -> u32 {
    self.count
  }

  pub fn selected(&self) -> &[String] {
    &self.selected
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }
}

fn describe(event: &MultiSelectEvent) -> String {
  match event {
    MultiSelectEvent::Opened => "Opened".to_string(),
    MultiSelectEvent::Closed => "Closed".to_string(),
    MultiSelectEvent::Toggled { label, selected } => {
      if *selected {
        format!("Selected {}", label)
      } else {
        format!("Deselected {}", label)
      }
    }
    MultiSelectEvent::Removed { label } => format!("Removed {}", label),
    MultiSelectEvent::FilterChanged(query) if query.is_empty() => "Search cleared".to_string(),
    MultiSelectEvent::FilterChanged(query) => format!("Searching '{}'", query),
  }
}
