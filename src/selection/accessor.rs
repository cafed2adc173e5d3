//! Projections from an item to its key and its display label.

use crate::error::{Result, SelectError};
use serde_json::Value;
use std::fmt::Debug;
use std::rc::Rc;

/// Trait for reading the identifier and display label of an item.
///
/// The key decides equality and selection membership, the label is what the
/// user sees and what search text is matched against.
pub trait ItemAccessor<T> {
  /// Identifier type; two items with equal keys are the same selection entry
  type Key: PartialEq + Clone + Debug;

  /// Identifier of the item
  fn key(&self, item: &T) -> Self::Key;

  /// Display label of the item
  fn label(&self, item: &T) -> String;

  /// Check that every item can be read by this accessor.
  /// Typed accessors cannot fail, so the default accepts everything.
  fn validate(&self, _items: &[T]) -> Result<()> {
    Ok(())
  }
}

/// Accessor built from a pair of closures.
pub struct FnAccessor<T, K> {
  key: Rc<dyn Fn(&T) -> K>,
  label: Rc<dyn Fn(&T) -> String>,
}

impl<T, K> FnAccessor<T, K> {
  pub fn new<F, G>(key: F, label: G) -> Self
  where
    F: Fn(&T) -> K + 'static,
    G: Fn(&T) -> String + 'static,
  {
    Self {
      key: Rc::new(key),
      label: Rc::new(label),
    }
  }
}

impl<T, K> Clone for FnAccessor<T, K> {
  fn clone(&self) -> Self {
    Self {
      key: Rc::clone(&self.key),
      label: Rc::clone(&self.label),
    }
  }
}

impl<T, K: PartialEq + Clone + Debug> ItemAccessor<T> for FnAccessor<T, K> {
  type Key = K;

  fn key(&self, item: &T) -> K {
    (self.key)(item)
  }

  fn label(&self, item: &T) -> String {
    (self.label)(item)
  }
}

/// Accessor for JSON records that designates the key and label by field name.
///
/// Used when items come from a data file and their shape is only known at
/// runtime. `validate` rejects item lists where a field is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFields {
  key_field: String,
  label_field: String,
}

impl JsonFields {
  pub fn new(key_field: impl Into<String>, label_field: impl Into<String>) -> Result<Self> {
    let key_field = key_field.into();
    let label_field = label_field.into();

    if key_field.trim().is_empty() {
      return Err(SelectError::Configuration(
        "identifier field name must not be empty".to_string(),
      ));
    }
    if label_field.trim().is_empty() {
      return Err(SelectError::Configuration(
        "display field name must not be empty".to_string(),
      ));
    }

    Ok(Self {
      key_field,
      label_field,
    })
  }

  pub fn key_field(&self) -> &str {
    &self.key_field
  }

  pub fn label_field(&self) -> &str {
    &self.label_field
  }

  fn check_field(field: &str, index: usize, item: &Value) -> Result<()> {
    match item.get(field) {
      Some(_) => Ok(()),
      None => Err(SelectError::Configuration(format!(
        "field '{}' not found on item {}",
        field, index
      ))),
    }
  }
}

impl ItemAccessor<Value> for JsonFields {
  type Key = Value;

  fn key(&self, item: &Value) -> Value {
    item.get(&self.key_field).cloned().unwrap_or(Value::Null)
  }

  fn label(&self, item: &Value) -> String {
    match item.get(&self.label_field) {
      Some(Value::String(s)) => s.clone(),
      Some(Value::Null) | None => String::new(),
      Some(other) => other.to_string(),
    }
  }

  fn validate(&self, items: &[Value]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
      Self::check_field(&self.key_field, index, item)?;
      Self::check_field(&self.label_field, index, item)?;
    }
    Ok(())
  }
}
