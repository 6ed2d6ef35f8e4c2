//! Branch, staging, commit and push operations for SystemGit

use super::CommitRequest;
use super::system_git::SystemGit;
use crate::core::error::{ActionError, ActionResult, GitError, ResultExt};
use crate::utils::path_to_git_format;
use std::path::PathBuf;

impl SystemGit {
  /// Check whether `branch` exists on `remote`
  ///
  /// Uses `git ls-remote --exit-code`, which exits with 2 when no ref matched.
  pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> ActionResult<bool> {
    let refname = format!("refs/heads/{}", branch);
    let output = self
      .git_cmd()
      .args(["ls-remote", "--exit-code", "--heads", remote, &refname])
      .output()
      .context("Failed to run git ls-remote")?;

    match output.status.code() {
      Some(0) => Ok(true),
      Some(2) => Ok(false),
      _ => Err(ActionError::Git(GitError::CommandFailed {
        command: format!("git ls-remote --exit-code --heads {} {}", remote, refname),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      })),
    }
  }

  /// Fetch a single branch into its remote-tracking ref
  pub fn fetch_branch(&self, remote: &str, branch: &str) -> ActionResult<()> {
    tracing::debug!(remote, branch, "fetching branch");
    let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
    self.run(&["fetch", "--no-tags", remote, &refspec], "Failed to fetch")?;
    Ok(())
  }

  /// Fetch a remote branch and check it out locally, resetting any stale local copy
  pub fn checkout_remote_branch(&self, remote: &str, branch: &str) -> ActionResult<()> {
    self.fetch_branch(remote, branch)?;

    let start_point = format!("{}/{}", remote, branch);
    self
      .run(&["checkout", "-B", branch, &start_point], "Failed to checkout branch")
      .map_err(|e| branch_error(e, branch))?;
    Ok(())
  }

  /// Create (or reset) a local branch at HEAD and check it out
  pub fn create_and_checkout_branch(&self, branch: &str) -> ActionResult<()> {
    self
      .run(&["checkout", "-B", branch], "Failed to create branch")
      .map_err(|e| branch_error(e, branch))?;
    Ok(())
  }

  /// Stage paths (relative to the working tree)
  pub fn stage(&self, paths: &[PathBuf]) -> ActionResult<()> {
    if paths.is_empty() {
      return Ok(());
    }

    let paths: Vec<String> = paths.iter().map(|p| path_to_git_format(p)).collect();
    let mut args = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));
    self.run(&args, "Failed to stage files")?;
    Ok(())
  }

  /// Whether the index differs from HEAD
  pub fn has_staged_changes(&self) -> ActionResult<bool> {
    let output = self
      .git_cmd()
      .args(["diff", "--cached", "--quiet"])
      .output()
      .context("Failed to run git diff")?;

    match output.status.code() {
      Some(0) => Ok(false),
      Some(1) => Ok(true),
      _ => Err(ActionError::Git(GitError::CommandFailed {
        command: "git diff --cached --quiet".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      })),
    }
  }

  /// Commit the index and return the new HEAD SHA
  pub fn commit(&self, request: &CommitRequest<'_>) -> ActionResult<String> {
    let mut cmd = self.git_cmd();
    cmd.arg("-c").arg(format!("user.name={}", request.author_name));
    cmd.arg("-c").arg(format!("user.email={}", request.author_email));
    cmd.arg("commit").arg("-m").arg(request.title);
    if !request.body.trim().is_empty() {
      cmd.arg("-m").arg(request.body);
    }
    match request.signing_key {
      Some(key) => {
        cmd.arg(format!("--gpg-sign={}", key));
      }
      None => {
        cmd.arg("--no-gpg-sign");
      }
    }

    let output = cmd.output().context("Failed to run git commit")?;
    if !output.status.success() {
      return Err(ActionError::Git(GitError::CommandFailed {
        command: "git commit".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    self.head_commit()
  }

  /// List all remotes
  pub fn list_remotes(&self) -> ActionResult<Vec<(String, String)>> {
    let output = self
      .git_cmd()
      .args(["remote", "-v"])
      .output()
      .context("Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut remotes = Vec::new();

    for line in stdout.lines() {
      // Format: "origin  git@github.com:user/repo.git (fetch)"
      let parts: Vec<&str> = line.split_whitespace().collect();
      if parts.len() >= 2 && line.contains("(fetch)") {
        remotes.push((parts[0].to_string(), parts[1].to_string()));
      }
    }

    Ok(remotes)
  }

  /// Check if remote exists
  pub fn has_remote(&self, name: &str) -> ActionResult<bool> {
    let remotes = self.list_remotes()?;
    Ok(remotes.iter().any(|(n, _)| n == name))
  }

  /// Push a branch and set its upstream
  pub fn push_to_remote(&self, remote_name: &str, branch: &str) -> ActionResult<()> {
    tracing::debug!(remote = remote_name, branch, "pushing branch");

    let output = self
      .git_cmd()
      .args(["push", "-u", remote_name, branch])
      .output()
      .context("Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ActionError::Git(GitError::PushFailed {
        remote: remote_name.to_string(),
        branch: branch.to_string(),
        reason: stderr.to_string(),
      }));
    }

    Ok(())
  }
}

fn branch_error(err: ActionError, branch: &str) -> ActionError {
  match err {
    ActionError::Git(GitError::CommandFailed { stderr, .. }) => ActionError::Git(GitError::BranchError {
      message: format!("{}: {}", branch, stderr.trim()),
    }),
    other => other,
  }
}
