use color_eyre::{eyre::eyre, Result};
use multiselect::FnAccessor;
use serde_json::Value;
use std::path::Path;

/// Built-in demo record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
  pub id: u32,
  pub name: String,
  pub surname: String,
}

impl Person {
  fn new(id: u32, name: &str, surname: &str) -> Self {
    Self {
      id,
      name: name.to_string(),
      surname: surname.to_string(),
    }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.name, self.surname)
  }
}

pub fn people() -> Vec<Person> {
  vec![
    Person::new(1, "John", "Doe"),
    Person::new(2, "Jane", "Doe"),
    Person::new(3, "Antonio", "Glešić"),
    Person::new(4, "Diana", "Krndija"),
  ]
}

/// Accessor keyed by id, labelled by full name
pub fn person_accessor() -> FnAccessor<Person, u32> {
  FnAccessor::new(|p: &Person| p.id, Person::full_name)
}

/// Read a JSON array of records
pub fn load_items(path: &Path) -> Result<Vec<Value>> {
  let contents = std::fs::read_to_string(path)
    .map_err(|e| eyre!("Failed to read items file {}: {}", path.display(), e))?;
  parse_items(&contents).map_err(|e| eyre!("Invalid items file {}: {}", path.display(), e))
}

fn parse_items(contents: &str) -> Result<Vec<Value>> {
  match serde_json::from_str::<Value>(contents)? {
    Value::Array(items) => Ok(items),
    _ => Err(eyre!("expected a JSON array of objects")),
  }
}
