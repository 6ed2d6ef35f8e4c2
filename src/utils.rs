//! Small string and path helpers shared by commands

use crate::core::config::CURRENT_YEAR_PLACEHOLDER;
use std::path::Path;

/// Substitute `{{currentYear}}` in a user-provided text
pub fn render_template(template: &str, current_year: u32) -> String {
  template.replace(CURRENT_YEAR_PLACEHOLDER, &current_year.to_string())
}

/// Split a comma- or newline-separated input into trimmed, non-empty items
pub fn split_list(input: &str) -> Vec<String> {
  input
    .split([',', '\n'])
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(String::from)
    .collect()
}

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
