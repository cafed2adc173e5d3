/// Generic result type for component key handling.
///
/// Components report whether they consumed a key and, if so, whether the
/// parent has an event to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, no event for parent to handle
  Handled,
  /// Key was consumed, here's an event for parent to process
  Event(T),
  /// Key was not consumed, parent should try next handler
  NotHandled,
}

impl<T> KeyResult<T> {
  pub fn is_handled(&self) -> bool {
    !matches!(self, KeyResult::NotHandled)
  }

  /// Map the event payload, keeping handled/not-handled as is
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> KeyResult<U> {
    match self {
      KeyResult::Handled => KeyResult::Handled,
      KeyResult::Event(e) => KeyResult::Event(f(e)),
      KeyResult::NotHandled => KeyResult::NotHandled,
    }
  }
}
