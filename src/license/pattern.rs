//! Validation of the user-supplied `transform` pattern

use super::dialect::{CUSTOM_DIALECT, Dialect, FROM_GROUP, YearShape};
use crate::core::error::TransformError;
use regex::RegexBuilder;

/// Validate the `transform` input and build the custom dialect from it
///
/// An empty (or blank) pattern is the sentinel for "use the built-in dialects"
/// and yields `None`. Anything else must compile and declare a `from` group.
/// Custom patterns are matched case-insensitively and line by line, like the
/// built-ins.
pub fn validate_custom_pattern(pattern: &str) -> Result<Option<Dialect>, TransformError> {
  if pattern.trim().is_empty() {
    return Ok(None);
  }

  let invalid = |reason: String| TransformError::InvalidCustomPattern {
    pattern: pattern.to_string(),
    reason,
  };

  let matcher = RegexBuilder::new(pattern)
    .case_insensitive(true)
    .multi_line(true)
    .build()
    .map_err(|e| invalid(e.to_string()))?;

  if !matcher.capture_names().flatten().any(|name| name == FROM_GROUP) {
    return Err(invalid(format!("missing a capture group named `{}`, e.g. (?<from>\\d{{4}})", FROM_GROUP)));
  }

  Ok(Some(Dialect::new(CUSTOM_DIALECT, YearShape::Any, matcher, Vec::new())))
}
