use crate::core::error::ActionResult;
use crate::license::{Dialect, YearShape, builtin_dialects};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DialectEntry<'a> {
  order: usize,
  name: &'static str,
  shape: YearShape,
  pattern: &'a str,
  guards: Vec<String>,
}

impl<'a> DialectEntry<'a> {
  fn new(order: usize, dialect: &'a Dialect) -> Self {
    Self {
      order,
      name: dialect.name(),
      shape: dialect.shape(),
      pattern: dialect.pattern(),
      guards: dialect.guards().iter().map(ToString::to_string).collect(),
    }
  }
}

/// List the built-in dialects in the order they are tried
pub fn run_dialects(json: bool) -> ActionResult<()> {
  let entries: Vec<DialectEntry> = builtin_dialects()
    .iter()
    .enumerate()
    .map(|(i, d)| DialectEntry::new(i + 1, d))
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&entries)?);
    return Ok(());
  }

  println!("📜 Built-in dialects (first match wins):\n");
  for entry in &entries {
    let shape = match entry.shape {
      YearShape::Single => "single year",
      YearShape::Range => "year range",
      YearShape::Any => "any",
    };
    println!("  {}. {} ({})", entry.order, entry.name, shape);
    println!("     {}", entry.pattern);
    for guard in &entry.guards {
      println!("     guard: {}", guard);
    }
  }
  println!("\n💡 A custom `transform` pattern replaces all of these.");

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_entries_follow_registry_order() {
    let entries: Vec<DialectEntry> = builtin_dialects()
      .iter()
      .enumerate()
      .map(|(i, d)| DialectEntry::new(i + 1, d))
      .collect();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0].name, "AGPL-3.0-only");
    assert_eq!(entries[0].guards, vec!["not followed by \"Free Software Foundation\""]);
    assert_eq!(entries[5].order, 6);

    let value = serde_json::to_value(&entries[3]).unwrap();
    assert_eq!(value["shape"], "range");
    assert_eq!(value["name"], "Apache-2.0");
  }
}
