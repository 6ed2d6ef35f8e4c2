//! Tests for the `run` command (pull request creation is skipped, gh is not available in tests)

use crate::helpers::*;
use anyhow::Result;

const BRANCH_2024: &str = "license/copyright-to-2024";

#[test]
fn test_run_pushes_year_branch() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  let outputs = tempfile::TempDir::new()?;
  let output_file = outputs.path().join("github_output");
  let output_path = output_file.display().to_string();

  let output = run_license_year_with_env(
    &repo.path,
    &["run", "--current-year", "2024", "--no-pull-request", "--json"],
    &[("GITHUB_OUTPUT", output_path.as_str())],
  )?;
  let report = stdout_json(&output)?;

  assert_eq!(report["status"], "pushed");
  assert_eq!(report["branch_name"], BRANCH_2024);
  assert_eq!(report["updated"][0], "LICENSE");
  assert!(report["commit"].as_str().is_some());

  assert!(repo.remote_has_branch(BRANCH_2024)?);
  assert_eq!(repo.read_remote_file(BRANCH_2024, "LICENSE")?, "Copyright 2019-2024 Jane Doe\n");
  assert_eq!(repo.read_remote_file("main", "LICENSE")?, "Copyright 2019 Jane Doe\n");
  assert_eq!(
    repo.remote_log(BRANCH_2024)?,
    vec!["docs(license): update copyright year(s)", "Initial commit"]
  );

  let author = git(&repo.origin, &["log", "-1", "--format=%an <%ae>", BRANCH_2024])?;
  assert_eq!(
    String::from_utf8_lossy(&author.stdout).trim(),
    "github-actions <github-actions@github.com>"
  );

  let github_output = std::fs::read_to_string(&output_file)?;
  assert!(github_output.contains("currentYear=2024\n"));
  assert!(github_output.contains(&format!("branchName={}\n", BRANCH_2024)));
  assert!(github_output.contains("pullRequestNumber=\n"));
  Ok(())
}

#[test]
fn test_run_twice_in_a_year_is_a_noop() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  let args = ["run", "--current-year", "2024", "--no-pull-request", "--json"];

  run_license_year(&repo.path, &args)?;
  let output = run_license_year(&repo.path, &args)?;
  let report = stdout_json(&output)?;

  assert_eq!(report["status"], "no_changes");
  assert_eq!(repo.remote_log(BRANCH_2024)?.len(), 2);
  Ok(())
}

#[test]
fn test_run_continues_existing_branch() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  repo.write_file("packages/core/LICENSE", "Copyright (c) 2020, Acme Inc.\n")?;
  repo.commit_and_push("Add core package")?;
  let envs = [("INPUT_BRANCHNAME", "license/update"), ("INPUT_PATH", "LICENSE")];

  run_license_year_with_env(&repo.path, &["run", "--current-year", "2024", "--no-pull-request"], &envs)?;

  // A later run with more files lands on top of the pushed branch
  let envs = [
    ("INPUT_BRANCHNAME", "license/update"),
    ("INPUT_PATH", "LICENSE\npackages/*/LICENSE"),
    ("INPUT_COMMITTITLE", "chore: copyright {{currentYear}}"),
  ];
  run_license_year_with_env(&repo.path, &["run", "--current-year", "2025", "--no-pull-request"], &envs)?;

  assert_eq!(
    repo.remote_log("license/update")?,
    vec![
      "chore: copyright 2025",
      "docs(license): update copyright year(s)",
      "Add core package",
      "Initial commit"
    ]
  );
  assert_eq!(repo.read_remote_file("license/update", "LICENSE")?, "Copyright 2019-2025 Jane Doe\n");
  assert_eq!(
    repo.read_remote_file("license/update", "packages/core/LICENSE")?,
    "Copyright (c) 2020-2025, Acme Inc.\n"
  );
  Ok(())
}

#[test]
fn test_run_current_license_pushes_nothing() -> Result<()> {
  let repo = TestRepo::new("Copyright (c) 2024, Acme Inc.\n")?;

  let output = run_license_year(&repo.path, &["run", "--current-year", "2024", "--no-pull-request", "--json"])?;
  let report = stdout_json(&output)?;

  assert_eq!(report["status"], "no_changes");
  assert!(!repo.remote_has_branch(BRANCH_2024)?);
  Ok(())
}

#[test]
fn test_run_unsupported_license_aborts() -> Result<()> {
  let repo = TestRepo::new("Copyright (C) 2015 Free Software Foundation, Inc.\n")?;

  let output = run_license_year_raw(&repo.path, &["run", "--current-year", "2024", "--no-pull-request"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Unsupported license"), "stderr: {}", stderr);
  assert!(stderr.contains("LICENSE"), "stderr: {}", stderr);
  assert!(!repo.remote_has_branch(BRANCH_2024)?);
  Ok(())
}

#[test]
fn test_run_unsupported_file_leaves_tree_untouched() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;
  repo.write_file("NOTICE", "no license notice here\n")?;
  repo.commit_and_push("Add notice")?;

  let output = run_license_year_raw(
    &repo.path,
    &["run", "--current-year", "2024", "--no-pull-request"],
    &[("INPUT_PATH", "LICENSE\nNOTICE")],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("NOTICE"));
  // LICENSE sorts first and is supported, yet stays as it was
  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019 Jane Doe\n");
  assert!(!repo.remote_has_branch(BRANCH_2024)?);
  Ok(())
}

#[test]
fn test_run_custom_pattern_never_falls_back() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;

  let output = run_license_year_raw(
    &repo.path,
    &[
      "run",
      "--current-year",
      "2024",
      "--transform",
      r"(?<from>\d{4}) XCorp",
      "--no-pull-request",
    ],
    &[],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(!repo.remote_has_branch(BRANCH_2024)?);
  Ok(())
}

#[test]
fn test_run_unknown_remote_fails() -> Result<()> {
  let repo = TestRepo::new("Copyright 2019 Jane Doe\n")?;

  let output = run_license_year_raw(
    &repo.path,
    &["run", "--current-year", "2024", "--remote", "upstream", "--no-pull-request"],
    &[],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Remote 'upstream' is not configured"));
  assert_eq!(repo.read_file("LICENSE")?, "Copyright 2019 Jane Doe\n");
  Ok(())
}

#[test]
fn test_run_outside_repository_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("LICENSE"), "Copyright 2019 Jane Doe\n")?;

  let output = run_license_year_raw(dir.path(), &["run", "--no-pull-request"], &[])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Git repository not found"));
  Ok(())
}
