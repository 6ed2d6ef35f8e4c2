//! Copyright notice dialects and the built-in registry
//!
//! A dialect is a compiled matcher plus a list of guards. The matcher locates a
//! notice and captures its first year in the `from` group (and, for built-in
//! ranges, the last year in `to`). Guards are checked against the text that follows the
//! year span, standing in for the look-ahead the `regex` crate does not offer.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::ops::Range;

/// Capture group holding the first year of a notice
pub const FROM_GROUP: &str = "from";

/// Capture group holding the last year of a built-in range notice
pub const TO_GROUP: &str = "to";

/// Name given to the dialect built from the `transform` input
pub const CUSTOM_DIALECT: &str = "Custom";

/// Structural shape of the notice a dialect recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YearShape {
  /// `Copyright 2019 ...`
  Single,
  /// `Copyright 2019-2022 ...`
  Range,
  /// Whatever a user-supplied pattern matches
  Any,
}

/// Rule evaluated on the text right after the year span of a candidate match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
  /// Reject when the remaining text starts with this phrase (ASCII case-insensitive, leading whitespace skipped)
  NotFollowedBy(&'static str),
}

impl Guard {
  fn accepts(&self, rest: &str) -> bool {
    match self {
      Guard::NotFollowedBy(phrase) => {
        let rest = rest.trim_start();
        rest
          .get(..phrase.len())
          .is_none_or(|head| !head.eq_ignore_ascii_case(phrase))
      }
    }
  }
}

impl std::fmt::Display for Guard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Guard::NotFollowedBy(phrase) => write!(f, "not followed by \"{}\"", phrase),
    }
  }
}

/// A named copyright notice rule
#[derive(Debug, Clone)]
pub struct Dialect {
  name: &'static str,
  shape: YearShape,
  matcher: Regex,
  guards: Vec<Guard>,
}

/// Location of an accepted notice inside a license text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMatch {
  /// The captured first year
  pub from: u32,
  /// Byte span of the `from` capture, kept verbatim in the rewrite
  pub from_span: Range<usize>,
  /// Byte span of the year token(s), `2019` or `2019-2022`
  pub span: Range<usize>,
}

impl Dialect {
  pub(crate) fn new(name: &'static str, shape: YearShape, matcher: Regex, guards: Vec<Guard>) -> Self {
    Self {
      name,
      shape,
      matcher,
      guards,
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn shape(&self) -> YearShape {
    self.shape
  }

  /// Source of the compiled matcher
  pub fn pattern(&self) -> &str {
    self.matcher.as_str()
  }

  pub fn guards(&self) -> &[Guard] {
    &self.guards
  }

  /// Find the first notice in `text` accepted by every guard
  pub fn find(&self, text: &str) -> Option<YearMatch> {
    self
      .matcher
      .captures_iter(text)
      .find_map(|caps| self.accept(text, &caps))
  }

  fn accept(&self, text: &str, caps: &Captures<'_>) -> Option<YearMatch> {
    let from = caps.name(FROM_GROUP)?;
    let year = from.as_str().parse::<u32>().ok()?;

    // User patterns may name any group; only built-in ranges place `to` after `from`
    let end = match (self.shape, caps.name(TO_GROUP)) {
      (YearShape::Range, Some(to)) => to.end(),
      _ => trailing_year_end(text, from.end()),
    };

    let rest = &text[end..];
    if !self.guards.iter().all(|guard| guard.accepts(rest)) {
      tracing::trace!(dialect = self.name, offset = from.start(), "candidate rejected by guard");
      return None;
    }

    Some(YearMatch {
      from: year,
      from_span: from.range(),
      span: from.start()..end,
    })
  }
}

/// End of a `-YYYY` suffix starting at `pos`, or `pos` when there is none
///
/// Lets a pattern that only captures `from` still collapse an existing range.
fn trailing_year_end(text: &str, pos: usize) -> usize {
  let bytes = text.as_bytes();
  let year_end = pos + 5;
  let is_suffix = bytes.get(pos) == Some(&b'-')
    && bytes.get(pos + 1..year_end).is_some_and(|d| d.iter().all(u8::is_ascii_digit))
    && !bytes.get(year_end).is_some_and(u8::is_ascii_digit);

  if is_suffix { year_end } else { pos }
}

fn compile(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| panic!("built-in dialect pattern {:?} is invalid: {}", pattern, e))
}

/// Built-in dialects in trial order. Single and range variants sit next to each other.
static BUILTIN_DIALECTS: Lazy<Vec<Dialect>> = Lazy::new(|| {
  const AGPL: &str = "AGPL-3.0-only";
  const APACHE: &str = "Apache-2.0";
  const BSD_MIT: &str = "BSD-2-Clause/BSD-3-Clause/MIT";
  const FSF: Guard = Guard::NotFollowedBy("Free Software Foundation");

  vec![
    Dialect::new(
      AGPL,
      YearShape::Single,
      compile(r"(?m)(?i:\bcopyright) \(C\) (?<from>\d{4})(?:[^\d-]|$)"),
      vec![FSF],
    ),
    Dialect::new(
      AGPL,
      YearShape::Range,
      compile(r"(?m)(?i:\bcopyright) \(C\) (?<from>\d{4})-(?<to>\d{4})(?:\D|$)"),
      vec![FSF],
    ),
    Dialect::new(
      APACHE,
      YearShape::Single,
      compile(r"(?i)\bcopyright (?<from>\d{4})\s+\w"),
      vec![],
    ),
    Dialect::new(
      APACHE,
      YearShape::Range,
      compile(r"(?i)\bcopyright (?<from>\d{4})-(?<to>\d{4})\s+\w"),
      vec![],
    ),
    Dialect::new(
      BSD_MIT,
      YearShape::Single,
      compile(r"(?i:\bcopyright) \(c\) (?<from>\d{4}),"),
      vec![],
    ),
    Dialect::new(
      BSD_MIT,
      YearShape::Range,
      compile(r"(?i:\bcopyright) \(c\) (?<from>\d{4})-(?<to>\d{4}),"),
      vec![],
    ),
  ]
});

/// The built-in registry, in the order dialects are tried
pub fn builtin_dialects() -> &'static [Dialect] {
  &BUILTIN_DIALECTS
}
