//! Headless selection state for the multi-select widget.
//!
//! `SelectionController` owns the item list, the search-narrowed view, the
//! selected items and the dropdown visibility. Presentation layers read its
//! state through accessors and learn about changes by subscribing to a
//! `watch` channel instead of being told to redraw.
//!
//! # Example
//!
//! ```ignore
//! let accessor = FnAccessor::new(|p: &Person| p.id, |p: &Person| p.name.clone());
//! let mut controller = SelectionController::new(accessor);
//! controller.on_selection_changed(|selected| {
//!     println!("{} selected", selected.len());
//!     Ok(())
//! });
//!
//! controller.configure(people)?;
//! controller.apply_filter("an");
//! controller.toggle_filtered(0)?;
//! ```

pub mod accessor;
pub mod filter;

use crate::error::{ListenerError, Result, SelectError};
use accessor::ItemAccessor;
use tokio::sync::watch;
use tracing::{debug, error};

/// What kind of state change was published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
  /// Nothing has changed since construction
  Initial,
  /// The item collection was replaced
  Items,
  /// The search text and filtered view changed
  Filter,
  /// The selection changed
  Selection,
  /// The dropdown was opened or closed
  Visibility,
}

/// A published state change. The revision increases by one per change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
  pub revision: u64,
  pub kind: ChangeKind,
}

/// Callback invoked with the full selection after every selection change
pub type Listener<T> = Box<dyn FnMut(&[T]) -> std::result::Result<(), ListenerError>>;

/// Selection and filtering state machine for one widget instance.
pub struct SelectionController<T, A: ItemAccessor<T>> {
  accessor: A,
  items: Vec<T>,
  /// Whether `configure` has supplied a collection yet
  configured: bool,
  /// Indices into `items`, in collection order
  filtered: Vec<usize>,
  selection: Vec<T>,
  search_text: String,
  open: bool,
  listener: Option<Listener<T>>,
  changes: watch::Sender<StateChange>,
}

impl<T: Clone, A: ItemAccessor<T>> SelectionController<T, A> {
  pub fn new(accessor: A) -> Self {
    let (changes, _) = watch::channel(StateChange {
      revision: 0,
      kind: ChangeKind::Initial,
    });

    Self {
      accessor,
      items: Vec::new(),
      configured: false,
      filtered: Vec::new(),
      selection: Vec::new(),
      search_text: String::new(),
      open: false,
      listener: None,
      changes,
    }
  }

  /// Register the selection listener, replacing any previous one
  pub fn on_selection_changed<F>(&mut self, listener: F)
  where
    F: FnMut(&[T]) -> std::result::Result<(), ListenerError> + 'static,
  {
    self.listener = Some(Box::new(listener));
  }

  pub fn has_listener(&self) -> bool {
    self.listener.is_some()
  }

  /// Subscribe to state changes
  pub fn subscribe(&self) -> watch::Receiver<StateChange> {
    self.changes.subscribe()
  }

  /// Revision of the last published change
  pub fn revision(&self) -> u64 {
    self.changes.borrow().revision
  }

  /// Supply the item collection.
  ///
  /// The collection is only replaced when its key sequence differs from the
  /// held one, so re-supplying the same items keeps the current search
  /// narrowing. Returns whether the collection was replaced.
  pub fn configure(&mut self, items: Vec<T>) -> Result<bool> {
    self.accessor.validate(&items)?;

    if self.configured && self.same_keys(&items) {
      return Ok(false);
    }

    debug!(count = items.len(), "Replacing item collection");
    self.configured = true;
    self.items = items;
    self.filtered = (0..self.items.len()).collect();
    self.publish(ChangeKind::Items);
    Ok(true)
  }

  fn same_keys(&self, other: &[T]) -> bool {
    self.items.len() == other.len()
      && self
        .items
        .iter()
        .zip(other)
        .all(|(a, b)| self.accessor.key(a) == self.accessor.key(b))
  }

  /// Narrow the filtered view to items whose label contains `text`,
  /// ignoring case.
  ///
  /// Text made only of whitespace counts as empty and shows every item,
  /// even though no label may contain it. The raw text is still kept as
  /// the search text.
  pub fn apply_filter(&mut self, text: &str) {
    self.search_text = text.to_string();

    let needle = filter::needle(text);
    self.filtered = self
      .items
      .iter()
      .enumerate()
      .filter(|(_, item)| filter::matches(&self.accessor.label(item), needle.as_deref()))
      .map(|(i, _)| i)
      .collect();

    self.publish(ChangeKind::Filter);
  }

  pub fn clear_filter(&mut self) {
    self.apply_filter("");
  }

  /// Check if an item with the same key is selected
  pub fn is_selected(&self, item: &T) -> bool {
    self.position_of(&self.accessor.key(item)).is_some()
  }

  fn position_of(&self, key: &A::Key) -> Option<usize> {
    self
      .selection
      .iter()
      .position(|selected| &self.accessor.key(selected) == key)
  }

  /// Select the item if it is not selected, deselect it otherwise.
  ///
  /// Returns whether the item is selected afterwards. If the listener
  /// fails the selection keeps its new state and the failure is returned.
  pub fn toggle_selection(&mut self, item: T) -> Result<bool> {
    let key = self.accessor.key(&item);
    let selected = match self.position_of(&key) {
      Some(pos) => {
        self.selection.remove(pos);
        false
      }
      None => {
        self.selection.push(item);
        true
      }
    };

    debug!(?key, selected, "Toggled selection");
    self.selection_changed()?;
    Ok(selected)
  }

  /// Toggle the item at `index` of the filtered view
  pub fn toggle_filtered(&mut self, index: usize) -> Result<bool> {
    let item = self
      .filtered_get(index)
      .cloned()
      .ok_or(SelectError::InvalidItem {
        index,
        len: self.filtered.len(),
      })?;
    self.toggle_selection(item)
  }

  /// Remove the selected entry with the given key.
  /// Returns whether anything was removed.
  pub fn remove_by_key(&mut self, key: &A::Key) -> Result<bool> {
    let Some(pos) = self.position_of(key) else {
      return Ok(false);
    };

    self.selection.remove(pos);
    debug!(?key, "Removed selection");
    self.selection_changed()?;
    Ok(true)
  }

  /// Notify the listener and publish. The change is published even when
  /// the listener fails since the selection has already changed.
  fn selection_changed(&mut self) -> Result<()> {
    let notified = match self.listener.as_mut() {
      Some(listener) => listener(&self.selection),
      None => Ok(()),
    };

    self.publish(ChangeKind::Selection);

    notified.map_err(|e| {
      error!("Selection listener failed: {}", e);
      SelectError::SelectionChange(e)
    })
  }

  /// Flip dropdown visibility
  pub fn toggle_open(&mut self) {
    self.open = !self.open;
    self.publish(ChangeKind::Visibility);
  }

  pub fn open(&mut self) {
    if !self.open {
      self.toggle_open();
    }
  }

  pub fn close(&mut self) {
    if self.open {
      self.toggle_open();
    }
  }

  fn publish(&self, kind: ChangeKind) {
    let revision = self.changes.borrow().revision + 1;
    self.changes.send_replace(StateChange { revision, kind });
  }

  // Read-only views for rendering

  pub fn accessor(&self) -> &A {
    &self.accessor
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn filtered(&self) -> Vec<&T> {
    self.filtered.iter().map(|&i| &self.items[i]).collect()
  }

  pub fn filtered_len(&self) -> usize {
    self.filtered.len()
  }

  pub fn filtered_get(&self, index: usize) -> Option<&T> {
    self.filtered.get(index).map(|&i| &self.items[i])
  }

  pub fn selection(&self) -> &[T] {
    &self.selection
  }

  pub fn search_text(&self) -> &str {
    &self.search_text
  }

  pub fn is_open(&self) -> bool {
    self.open
  }
}

#[cfg(test)]
mod tests {
  use super::accessor::FnAccessor;
  use super::*;
  use std::cell::RefCell;
  use std::rc::Rc;

  #[derive(Debug, Clone, PartialEq)]
  struct Person {
    id: u32,
    name: String,
  }

  fn person(id: u32, name: &str) -> Person {
    Person {
      id,
      name: name.to_string(),
    }
  }

  fn people() -> Vec<Person> {
    vec![person(1, "John"), person(2, "Jane"), person(3, "Antonio")]
  }

  fn controller() -> SelectionController<Person, FnAccessor<Person, u32>> {
    let accessor = FnAccessor::new(|p: &Person| p.id, |p: &Person| p.name.clone());
    let mut controller = SelectionController::new(accessor);
    controller.configure(people()).unwrap();
    controller
  }

  fn ids(items: &[Person]) -> Vec<u32> {
    items.iter().map(|p| p.id).collect()
  }

  fn filtered_ids(controller: &SelectionController<Person, FnAccessor<Person, u32>>) -> Vec<u32> {
    controller.filtered().iter().map(|p| p.id).collect()
  }

  /// Attach a listener that records the ids of each notification
  fn record(
    controller: &mut SelectionController<Person, FnAccessor<Person, u32>>,
  ) -> Rc<RefCell<Vec<Vec<u32>>>> {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    controller.on_selection_changed(move |selected| {
      sink.borrow_mut().push(ids(selected));
      Ok(())
    });
    calls
  }

  #[test]
  fn test_empty_filter_shows_all_in_order() {
    let mut controller = controller();
    controller.apply_filter("jo");
    controller.apply_filter("");
    assert_eq!(filtered_ids(&controller), vec![1, 2, 3]);
  }

  #[test]
  fn test_filter_case_insensitive_substring() {
    let mut controller = controller();
    controller.apply_filter("an");
    assert_eq!(filtered_ids(&controller), vec![2, 3]);
    assert_eq!(controller.search_text(), "an");

    controller.apply_filter("JOHN");
    assert_eq!(filtered_ids(&controller), vec![1]);

    controller.apply_filter("xyz");
    assert!(controller.filtered().is_empty());
  }

  #[test]
  fn test_filter_membership_matches_label() {
    let mut controller = controller();
    for text in ["a", "J", "ton", "n", "zz"] {
      controller.apply_filter(text);
      let filtered = filtered_ids(&controller);
      for p in people() {
        let expected = p.name.to_lowercase().contains(&text.to_lowercase());
        assert_eq!(filtered.contains(&p.id), expected, "{} / {}", text, p.name);
      }
    }
  }

  #[test]
  fn test_whitespace_filter_shows_all() {
    let mut controller = controller();
    controller.apply_filter("   ");
    assert_eq!(filtered_ids(&controller), vec![1, 2, 3]);
  }

  #[test]
  fn test_toggle_twice_restores_selection() {
    let mut controller = controller();
    controller.toggle_selection(person(2, "Jane")).unwrap();
    let before = ids(controller.selection());

    assert!(controller.toggle_selection(person(3, "Antonio")).unwrap());
    assert!(!controller.toggle_selection(person(3, "Antonio")).unwrap());
    assert_eq!(ids(controller.selection()), before);
  }

  #[test]
  fn test_is_selected_by_key() {
    let mut controller = controller();
    let john = person(1, "John");
    assert!(!controller.is_selected(&john));

    controller.toggle_selection(john.clone()).unwrap();
    assert!(controller.is_selected(&john));
    // Equality is by key, not by the rest of the record
    assert!(controller.is_selected(&person(1, "Johnny")));

    controller.toggle_selection(person(1, "Johnny")).unwrap();
    assert!(!controller.is_selected(&john));
  }

  #[test]
  fn test_toggle_notifies_cumulative_selection() {
    let mut controller = controller();
    let calls = record(&mut controller);

    controller.toggle_selection(person(1, "John")).unwrap();
    controller.toggle_selection(person(2, "Jane")).unwrap();

    assert_eq!(ids(controller.selection()), vec![1, 2]);
    assert_eq!(*calls.borrow(), vec![vec![1], vec![1, 2]]);
  }

  #[test]
  fn test_toggle_same_item_twice_notifies_empty() {
    let mut controller = controller();
    let calls = record(&mut controller);

    controller.toggle_selection(person(1, "John")).unwrap();
    controller.toggle_selection(person(1, "John")).unwrap();

    assert!(controller.selection().is_empty());
    assert_eq!(*calls.borrow(), vec![vec![1], vec![]]);
  }

  #[test]
  fn test_toggle_without_listener() {
    let mut controller = controller();
    assert!(!controller.has_listener());
    assert!(controller.toggle_selection(person(1, "John")).unwrap());
  }

  #[test]
  fn test_listener_failure_keeps_selection() {
    let mut controller = controller();
    controller.on_selection_changed(|_| Err("listener gone".into()));

    let err = controller.toggle_selection(person(1, "John")).unwrap_err();
    assert!(matches!(err, SelectError::SelectionChange(_)));
    assert!(err.to_string().contains("listener gone"));
    assert_eq!(ids(controller.selection()), vec![1]);

    let err = controller.remove_by_key(&1).unwrap_err();
    assert!(matches!(err, SelectError::SelectionChange(_)));
    assert!(controller.selection().is_empty());
  }

  #[test]
  fn test_toggle_filtered() {
    let mut controller = controller();
    controller.apply_filter("an");
    assert!(controller.toggle_filtered(1).unwrap());
    assert_eq!(ids(controller.selection()), vec![3]);
  }

  #[test]
  fn test_toggle_filtered_out_of_range() {
    let mut controller = controller();
    controller.apply_filter("zz");
    let err = controller.toggle_filtered(0).unwrap_err();
    assert!(matches!(err, SelectError::InvalidItem { index: 0, len: 0 }));
    assert!(controller.selection().is_empty());
  }

  #[test]
  fn test_remove_by_key() {
    let mut controller = controller();
    controller.toggle_selection(person(1, "John")).unwrap();
    controller.toggle_selection(person(3, "Antonio")).unwrap();
    let calls = record(&mut controller);

    assert!(controller.remove_by_key(&1).unwrap());
    assert_eq!(ids(controller.selection()), vec![3]);
    assert_eq!(*calls.borrow(), vec![vec![3]]);
  }

  #[test]
  fn test_remove_unknown_key_is_noop() {
    let mut controller = controller();
    controller.toggle_selection(person(2, "Jane")).unwrap();
    let calls = record(&mut controller);
    let revision = controller.revision();

    assert!(!controller.remove_by_key(&9).unwrap());
    assert_eq!(ids(controller.selection()), vec![2]);
    assert!(calls.borrow().is_empty());
    assert_eq!(controller.revision(), revision);
  }

  #[test]
  fn test_configure_unchanged_keys_is_noop() {
    let mut controller = controller();
    controller.toggle_selection(person(1, "John")).unwrap();
    controller.apply_filter("an");
    let revision = controller.revision();

    // Same keys, different labels: still considered unchanged
    let same = vec![person(1, "J"), person(2, "J"), person(3, "A")];
    assert!(!controller.configure(same).unwrap());

    assert_eq!(filtered_ids(&controller), vec![2, 3]);
    assert_eq!(ids(controller.selection()), vec![1]);
    assert_eq!(controller.items()[0].name, "John");
    assert_eq!(controller.revision(), revision);
  }

  #[test]
  fn test_configure_empty_twice_is_noop() {
    let accessor = FnAccessor::new(|p: &Person| p.id, |p: &Person| p.name.clone());
    let mut controller = SelectionController::new(accessor);

    assert!(controller.configure(Vec::new()).unwrap());
    let revision = controller.revision();
    assert_eq!(revision, 1);

    assert!(!controller.configure(Vec::new()).unwrap());
    assert_eq!(controller.revision(), revision);

    // Going from empty to non-empty still replaces
    assert!(controller.configure(people()).unwrap());
    assert_eq!(filtered_ids(&controller), vec![1, 2, 3]);
  }

  #[test]
  fn test_configure_json_missing_field_leaves_state() {
    use super::accessor::JsonFields;
    use serde_json::json;

    let mut controller = SelectionController::new(JsonFields::new("id", "name").unwrap());
    controller
      .configure(vec![json!({"id": 1, "name": "John"}), json!({"id": 2, "name": "Jane"})])
      .unwrap();
    controller.apply_filter("ja");
    controller.toggle_selection(json!({"id": 2, "name": "Jane"})).unwrap();
    let revision = controller.revision();

    let err = controller
      .configure(vec![json!({"id": 3, "name": "Diana"}), json!({"id": 4})])
      .unwrap_err();
    assert!(matches!(err, SelectError::Configuration(ref msg) if msg.contains("'name'")));

    assert_eq!(controller.items().len(), 2);
    assert_eq!(controller.filtered(), vec![&json!({"id": 2, "name": "Jane"})]);
    assert_eq!(controller.search_text(), "ja");
    assert_eq!(controller.selection(), [json!({"id": 2, "name": "Jane"})]);
    assert_eq!(controller.revision(), revision);
  }

  #[test]
  fn test_configure_changed_keys_replaces() {
    let mut controller = controller();
    controller.toggle_selection(person(1, "John")).unwrap();
    controller.apply_filter("an");

    let reordered = vec![person(3, "Antonio"), person(1, "John"), person(2, "Jane")];
    assert!(controller.configure(reordered).unwrap());

    assert_eq!(filtered_ids(&controller), vec![3, 1, 2]);
    // Selection survives a refresh
    assert_eq!(ids(controller.selection()), vec![1]);
  }

  #[test]
  fn test_toggle_open() {
    let mut controller = controller();
    assert!(!controller.is_open());
    controller.toggle_open();
    assert!(controller.is_open());
    controller.toggle_open();
    assert!(!controller.is_open());

    let revision = controller.revision();
    controller.close();
    assert_eq!(controller.revision(), revision);
    controller.open();
    assert!(controller.is_open());
    assert_eq!(controller.revision(), revision + 1);
  }

  #[test]
  fn test_other_operations_leave_open_state() {
    let mut controller = controller();
    controller.apply_filter("a");
    controller.toggle_selection(person(1, "John")).unwrap();
    controller.configure(vec![person(5, "Diana")]).unwrap();
    assert!(!controller.is_open());
  }

  #[tokio::test]
  async fn test_subscribe_receives_changes() {
    let mut controller = controller();
    let mut rx = controller.subscribe();

    controller.toggle_open();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().kind, ChangeKind::Visibility);

    controller.apply_filter("j");
    controller.toggle_selection(person(1, "John")).unwrap();
    rx.changed().await.unwrap();
    let change = *rx.borrow_and_update();
    assert_eq!(change.kind, ChangeKind::Selection);
    assert_eq!(change.revision, controller.revision());
  }
}
