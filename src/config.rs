use color_eyre::{eyre::eyre, Result};
use multiselect::MultiSelectOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Presentation options for the multi-select
  pub widget: MultiSelectOptions,
  /// Where to write the log file (defaults to the user cache directory)
  pub log_dir: Option<PathBuf>,
  pub items: ItemsConfig,
}

/// Item source for the demo. Without a path the built-in people list is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ItemsConfig {
  /// JSON file holding an array of objects
  pub path: Option<PathBuf>,
  /// Field used as identifier
  pub key_field: String,
  /// Field shown to the user and searched
  pub label_field: String,
}

impl Default for ItemsConfig {
  fn default() -> Self {
    Self {
      path: None,
      key_field: "id".to_string(),
      label_field: "name".to_string(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./multiselect.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/multiselect/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("multiselect.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("multiselect").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.widget.validate()?;
    Ok(config)
  }

  /// Directory for the log file
  pub fn log_dir(&self) -> PathBuf {
    self
      .log_dir
      .clone()
      .or_else(|| dirs::cache_dir().map(|d| d.join("multiselect")))
      .unwrap_or_else(|| PathBuf::from("."))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_full() {
    let config = Config::parse(
      r#"
widget:
  can_search: false
  placeholder: Pick people
  width: 40
  height: 8
  custom_style: cyan
log_dir: /tmp/ms-logs
items:
  path: people.json
  key_field: Id
  label_field: FullName
"#,
    )
    .unwrap();

    assert!(!config.widget.can_search);
    assert_eq!(config.widget.placeholder, "Pick people");
    assert_eq!(config.widget.height, Some(8));
    assert_eq!(config.log_dir(), PathBuf::from("/tmp/ms-logs"));
    assert_eq!(config.items.path, Some(PathBuf::from("people.json")));
    assert_eq!(config.items.key_field, "Id");
    assert_eq!(config.items.label_field, "FullName");
  }

  #[test]
  fn test_parse_empty_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert!(config.widget.can_search);
    assert_eq!(config.widget.width, 30);
    assert_eq!(config.items.key_field, "id");
    assert_eq!(config.items.label_field, "name");
    assert!(config.items.path.is_none());
  }

  #[test]
  fn test_parse_rejects_bad_color() {
    let err = Config::parse("widget:\n  custom_style: chartreuse-ish\n").unwrap_err();
    assert!(err.to_string().contains("unknown color"));
  }

  #[test]
  fn test_missing_explicit_path() {
    let err = Config::load(Some(Path::new("/nonexistent/multiselect.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
