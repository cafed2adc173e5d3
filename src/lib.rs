//! Searchable multi-select dropdown for terminal UIs.
//!
//! [`selection::SelectionController`] holds the selection state and can back
//! any presentation layer; [`ui::components::MultiSelect`] renders it with
//! ratatui and drives it from crossterm key events.

pub mod error;
pub mod selection;
pub mod ui;

pub use error::{ListenerError, SelectError};
pub use selection::accessor::{FnAccessor, ItemAccessor, JsonFields};
pub use selection::{ChangeKind, SelectionController, StateChange};
pub use ui::components::{KeyResult, MultiSelect, MultiSelectEvent};
pub use ui::options::MultiSelectOptions;
