//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A working repository with a bare `origin` next to it
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  pub origin: PathBuf,
}

impl TestRepo {
  /// Create a repository whose first commit holds `LICENSE` with `license` as content
  pub fn new(license: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let origin = root.path().join("origin.git");
    let path = root.path().join("work");
    std::fs::create_dir_all(&path)?;

    git(root.path(), &["init", "--bare", "--initial-branch=main", "origin.git"])?;

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["remote", "add", "origin", &origin.display().to_string()])?;

    std::fs::write(path.join("LICENSE"), license)?;
    std::fs::write(path.join("README.md"), "# widgets\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;
    git(&path, &["push", "-u", "origin", "main"])?;

    Ok(Self {
      _root: root,
      path,
      origin,
    })
  }

  /// Write a file relative to the working tree
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file = self.path.join(path);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file, content)?;
    Ok(())
  }

  /// Commit current changes and push main
  pub fn commit_and_push(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    git(&self.path, &["push", "origin", "main"])?;
    Ok(())
  }

  /// Read a file from the working tree
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Read a file as committed on a branch of origin
  pub fn read_remote_file(&self, branch: &str, path: &str) -> Result<String> {
    let output = git(&self.origin, &["show", &format!("{}:{}", branch, path)])?;
    Ok(String::from_utf8(output.stdout)?)
  }

  /// Whether origin has the branch
  pub fn remote_has_branch(&self, branch: &str) -> Result<bool> {
    let output = Command::new("git")
      .current_dir(&self.origin)
      .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)])
      .output()
      .context("Failed to run git rev-parse")?;
    Ok(output.status.success())
  }

  /// Commit subjects on a branch of origin, newest first
  pub fn remote_log(&self, branch: &str) -> Result<Vec<String>> {
    let output = git(&self.origin, &["log", "--format=%s", branch])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run license-year with a clean environment plus `envs`, whatever the exit status
///
/// The environment is cleared so `INPUT_*`, `GITHUB_*` and token variables of the
/// machine running the tests never leak in.
pub fn run_license_year_raw(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_license-year");

  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args).env_clear();
  for key in ["PATH", "HOME"] {
    if let Ok(value) = std::env::var(key) {
      cmd.env(key, value);
    }
  }
  cmd.envs(envs.iter().copied());

  cmd.output().context("Failed to run license-year")
}

/// Run license-year and fail unless it succeeds
pub fn run_license_year_with_env(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let output = run_license_year_raw(cwd, args, envs)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "license-year command failed: license-year {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run license-year CLI command
pub fn run_license_year(cwd: &Path, args: &[&str]) -> Result<Output> {
  run_license_year_with_env(cwd, args, &[])
}

/// Parse the JSON document printed on stdout
pub fn stdout_json(output: &Output) -> Result<serde_json::Value> {
  serde_json::from_slice(&output.stdout).context("stdout is not valid JSON")
}
