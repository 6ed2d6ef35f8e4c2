//! Copyright-year substitution
//!
//! Picks the dialect that recognizes a license text (the custom one when
//! configured, otherwise the first built-in that matches) and rewrites the year
//! span of its first notice to `<from>-<target>`. Nothing outside that span is
//! touched, so line endings and encoding survive as-is.

use super::dialect::{Dialect, YearMatch, builtin_dialects};
use crate::core::error::TransformError;
use std::borrow::Cow;

/// Result of transforming one license text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation<'t> {
  /// Name of the dialect that recognized the notice
  pub dialect: &'static str,
  /// First year of the notice
  pub from: u32,
  /// The resulting text. Borrowed when nothing changed.
  pub text: Cow<'t, str>,
}

impl Transformation<'_> {
  pub fn is_changed(&self) -> bool {
    matches!(self.text, Cow::Owned(_))
  }
}

/// Transform a license text, returning the (possibly unchanged) text
pub fn apply_transform(custom: Option<&Dialect>, license_text: &str, target_year: u32) -> Result<String, TransformError> {
  transform(custom, license_text, target_year).map(|t| t.text.into_owned())
}

/// Transform a license text, reporting which dialect matched
///
/// With a custom dialect the built-ins are never tried: a pattern that does
/// not match is an error, not a reason to guess.
pub fn transform<'t>(
  custom: Option<&Dialect>,
  license_text: &'t str,
  target_year: u32,
) -> Result<Transformation<'t>, TransformError> {
  let (dialect, found) = select(custom, license_text).ok_or(TransformError::UnsupportedLicense { path: None })?;

  tracing::debug!(
    dialect = dialect.name(),
    from = found.from,
    span = ?found.span,
    "copyright notice recognized"
  );

  Ok(Transformation {
    dialect: dialect.name(),
    from: found.from,
    text: substitute(license_text, &found, target_year),
  })
}

fn select<'d>(custom: Option<&'d Dialect>, text: &str) -> Option<(&'d Dialect, YearMatch)> {
  match custom {
    Some(dialect) => dialect.find(text).map(|m| (dialect, m)),
    None => builtin_dialects()
      .iter()
      .find_map(|dialect| dialect.find(text).map(|m| (dialect, m))),
  }
}

fn substitute<'t>(text: &'t str, found: &YearMatch, target_year: u32) -> Cow<'t, str> {
  if found.from == target_year {
    return Cow::Borrowed(text);
  }

  let replacement = format!("{}-{}", &text[found.from_span.clone()], target_year);
  if text[found.span.clone()] == replacement {
    return Cow::Borrowed(text);
  }

  let mut updated = String::with_capacity(text.len() + replacement.len());
  updated.push_str(&text[..found.span.start]);
  updated.push_str(&replacement);
  updated.push_str(&text[found.span.end..]);
  Cow::Owned(updated)
}
