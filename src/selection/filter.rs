/// Normalize search text into a lowercase needle.
/// Returns `None` when the text is blank, meaning "match everything".
pub fn needle(text: &str) -> Option<String> {
  if text.trim().is_empty() {
    None
  } else {
    Some(text.to_lowercase())
  }
}

/// Case-insensitive substring match of a label against a prepared needle
pub fn matches(label: &str, needle: Option<&str>) -> bool {
  match needle {
    None => true,
    Some(n) => label.to_lowercase().contains(n),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_blank_matches_everything() {
    assert_eq!(needle(""), None);
    assert_eq!(needle("   "), None);
    assert!(matches("anything", None));
  }

  #[test]
  fn test_case_insensitive() {
    let n = needle("AN");
    assert!(matches("Jane", n.as_deref()));
    assert!(matches("Antonio", n.as_deref()));
    assert!(!matches("John", n.as_deref()));
  }

  #[test]
  fn test_non_ascii() {
    let n = needle("GLEŠ");
    assert!(matches("Antonio Glešić", n.as_deref()));
  }
}
