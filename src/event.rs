use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// Selection changed; carries the labels of the selected items
  SelectionChanged(Vec<String>),
}

/// Event handler that merges terminal input, a tick timer and events sent
/// from the app itself into one stream
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl Default for EventHandler {
  fn default() -> Self {
    Self::new()
  }
}

impl EventHandler {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self { tx, rx }
  }

  /// Sender for pushing events into the stream
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Spawn the terminal reader with the given tick rate
  pub fn start(&self, tick_rate: Duration) {
    let tx = self.tx.clone();

    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(CrosstermEvent::Key(key)) = event::read() {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
              continue;
            }
            if tx.send(Event::Key(key)).is_err() {
              break;
            }
          }
        } else if tx.send(Event::Tick).is_err() {
          break;
        }
      }
    });
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
