use crate::error::{Result, SelectError};
use ratatui::style::Color;
use serde::Deserialize;
use std::str::FromStr;

/// Border color when no custom style is set
const DEFAULT_ACCENT: Color = Color::Yellow;

/// Narrowest usable widget, in columns
const MIN_WIDTH: u16 = 12;

/// Presentation options for the multi-select component
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MultiSelectOptions {
  /// Show the search line in the dropdown
  pub can_search: bool,
  /// Hint shown in an empty search line
  pub placeholder: String,
  /// Widget width in columns
  pub width: u16,
  /// Dropdown height in rows (including borders); fits the items when unset
  pub height: Option<u16>,
  /// Accent color name or hex code (e.g. "cyan", "#ff8800")
  pub custom_style: Option<String>,
}

impl Default for MultiSelectOptions {
  fn default() -> Self {
    Self {
      can_search: true,
      placeholder: "Search...".to_string(),
      width: 30,
      height: None,
      custom_style: None,
    }
  }
}

impl MultiSelectOptions {
  pub fn with_search(mut self, can_search: bool) -> Self {
    self.can_search = can_search;
    self
  }

  pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
    self.placeholder = placeholder.into();
    self
  }

  pub fn with_width(mut self, width: u16) -> Self {
    self.width = width;
    self
  }

  pub fn with_height(mut self, height: u16) -> Self {
    self.height = Some(height);
    self
  }

  pub fn with_custom_style(mut self, style: impl Into<String>) -> Self {
    self.custom_style = Some(style.into());
    self
  }

  /// Accent color for borders and the highlighted row
  pub fn accent(&self) -> Result<Color> {
    match self.custom_style.as_deref().map(str::trim) {
      None | Some("") => Ok(DEFAULT_ACCENT),
      Some(name) => Color::from_str(name)
        .map_err(|_| SelectError::Configuration(format!("unknown color '{}'", name))),
    }
  }

  /// Check the options before building a widget
  pub fn validate(&self) -> Result<()> {
    if self.width < MIN_WIDTH {
      return Err(SelectError::Configuration(format!(
        "width must be at least {} columns, got {}",
        MIN_WIDTH, self.width
      )));
    }
    if let Some(height) = self.height {
      if height < 3 {
        return Err(SelectError::Configuration(format!(
          "height must be at least 3 rows, got {}",
          height
        )));
      }
    }
    self.accent().map(|_| ())
  }
}
