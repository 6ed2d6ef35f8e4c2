//! Tests for the `dialects` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_dialects_json_lists_registry_in_order() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let output = run_license_year(dir.path(), &["dialects", "--json"])?;
  let dialects = stdout_json(&output)?;

  let names: Vec<&str> = dialects
    .as_array()
    .unwrap()
    .iter()
    .map(|d| d["name"].as_str().unwrap())
    .collect();
  assert_eq!(
    names,
    vec![
      "AGPL-3.0-only",
      "AGPL-3.0-only",
      "Apache-2.0",
      "Apache-2.0",
      "BSD-2-Clause/BSD-3-Clause/MIT",
      "BSD-2-Clause/BSD-3-Clause/MIT",
    ]
  );
  assert_eq!(dialects[0]["shape"], "single");
  assert_eq!(dialects[1]["shape"], "range");
  assert!(dialects[0]["guards"][0].as_str().unwrap().contains("Free Software Foundation"));

  Ok(())
}

#[test]
fn test_dialects_text_output() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let output = run_license_year(dir.path(), &["dialects"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("1. AGPL-3.0-only (single year)"));
  assert!(stdout.contains("4. Apache-2.0 (year range)"));
  Ok(())
}
