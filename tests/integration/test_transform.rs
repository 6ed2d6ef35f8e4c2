//! Tests for the `transform` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_transform_dry_run_reports_without_writing() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;

  let output = run_license_year(&repo.path, &["transform", "--current-year", "2024", "--json"])?;
  let report = stdout_json(&output)?;

  assert_eq!(report["applied"], false);
  assert_eq!(report["files"][0]["path"], "LICENSE");
  assert_eq!(report["files"][0]["status"], "outdated");
  assert_eq!(report["files"][0]["dialect"], "Apache-2.0");
  assert_eq!(report["files"][0]["from"], 2019);
  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019 Jane Doe\n");
  Ok(())
}

#[test]
fn test_transform_apply_rewrites_matching_files() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019-2022 Jane Doe\n")?;
  repo.write_file("packages/a/LICENSE", "Copyright (c) 2020, Acme Inc.\r\nAll rights reserved.\r\n")?;
  repo.write_file("packages/b/LICENSE", "Copyright (c) 2024, Acme Inc.\n")?;

  run_license_year(
    &repo.path,
    &[
      "transform",
      "--current-year",
      "2024",
      "--path",
      "LICENSE\npackages/*/LICENSE",
      "--apply",
    ],
  )?;

  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019-2024 Jane Doe\n");
  assert_eq!(
    repo.read_file("packages/a/LICENSE")?,
    "Copyright (c) 2020-2024, Acme Inc.\r\nAll rights reserved.\r\n"
  );
  assert_eq!(repo.read_file("packages/b/LICENSE")?, "Copyright (c) 2024, Acme Inc.\n");
  Ok(())
}

#[test]
fn test_transform_apply_is_idempotent() -> Result<()> {
  let repo = TestRepo::new("Copyright (C) 2015 Jane Doe\n\nThis program is free software.\n")?;
  let args = ["transform", "--current-year", "2024", "--apply"];

  run_license_year(&repo.path, &args)?;
  let once = repo.read_file("LICENSE")?;
  run_license_year(&repo.path, &args)?;

  assert_eq!(once, "Copyright (C) 2015-2024 Jane Doe\n\nThis program is free software.\n");
  assert_eq!(repo.read_file("LICENSE")?, once);
  Ok(())
}

#[test]
fn test_transform_custom_pattern() -> Result<()> {
  let repo = TestRepo::new("1999 XCorp\n")?;

  run_license_year(
    &repo.path,
    &[
      "transform",
      "--current-year",
      "2030",
      "--transform",
      r"(?<from>\d{4}) XCorp",
      "--apply",
    ],
  )?;

  assert_eq!(repo.read_file("LICENSE")?, "1999-2030 XCorp\n");
  Ok(())
}

#[test]
fn test_transform_unsupported_license_fails() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  repo.write_file("NOTICE", "no license notice here\n")?;

  let output = run_license_year_raw(
    &repo.path,
    &["transform", "LICENSE", "NOTICE", "--current-year", "2024", "--apply"],
    &[],
  )?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Unsupported license"), "stderr: {}", stderr);
  assert!(stderr.contains("NOTICE"), "stderr: {}", stderr);
  // Supported files in the same batch are still rewritten
  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019-2024 Jane Doe\n");
  Ok(())
}

#[test]
fn test_transform_invalid_custom_pattern_fails_early() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;

  let output = run_license_year_raw(
    &repo.path,
    &["transform", "--transform", r"Copyright \d{4}", "--apply"],
    &[],
  )?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Invalid custom transform"), "stderr: {}", stderr);
  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019 Jane Doe\n");
  Ok(())
}

#[test]
fn test_transform_reads_config_file() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  repo.write_file("COPYING", "Copyright (c) 2021, Acme Inc.\n")?;
  repo.write_file(".github/license-year.toml", "path = \"COPYING\"\n")?;

  run_license_year(&repo.path, &["transform", "--current-year", "2024", "--apply"])?;

  assert_eq!(repo.read_file("COPYING")?, "Copyright (c) 2021-2024, Acme Inc.\n");
  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019 Jane Doe\n");
  Ok(())
}

#[test]
fn test_transform_action_inputs_override_config_file() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  repo.write_file("COPYING", "Copyright (c) 2021, Acme Inc.\n")?;
  repo.write_file("license-year.toml", "path = \"COPYING\"\n")?;

  run_license_year_with_env(
    &repo.path,
    &["transform", "--current-year", "2024", "--apply"],
    &[("INPUT_PATH", "LICENSE")],
  )?;

  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019-2024 Jane Doe\n");
  assert_eq!(repo.read_file("COPYING")?, "Copyright (c) 2021, Acme Inc.\n");
  Ok(())
}

#[test]
fn test_transform_no_matching_files() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;

  let output = run_license_year_raw(&repo.path, &["transform", "--path", "LICENSE.md"], &[])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(String::from_utf8_lossy(&output.stderr).contains("No files matched"));
  Ok(())
}
