use thiserror::Error;

/// Error type returned by selection listeners.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the selection controller and the multi-select component.
#[derive(Error, Debug)]
pub enum SelectError {
  /// A designated field is empty or does not resolve on an item,
  /// or a presentation option is invalid
  #[error("Configuration error: {0}")]
  Configuration(String),

  /// No item exists at the requested position of the filtered view
  #[error("No item at index {index} (filtered view has {len} items)")]
  InvalidItem { index: usize, len: usize },

  /// The selection listener failed. The selection was already updated.
  #[error("Selection listener failed: {0}")]
  SelectionChange(#[source] ListenerError),
}

pub type Result<T> = std::result::Result<T, SelectError>;
