//! Pull request management via the gh CLI

use crate::core::config::Secret;
use crate::core::error::{ActionError, ActionResult, GitHubError};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::process::Command;

/// A pull request as reported by gh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  pub url: String,
}

/// gh invocations scoped to one repository and token
pub struct GitHubCli {
  token: Secret,
  /// `owner/name`; gh infers it from the git remote when unset
  repository: Option<String>,
}

impl GitHubCli {
  pub fn new(token: Secret, repository: Option<String>) -> Self {
    Self { token, repository }
  }

  /// Use `GITHUB_REPOSITORY` as set by the Actions runner
  pub fn from_env(token: Secret) -> Self {
    let repository = std::env::var("GITHUB_REPOSITORY").ok().filter(|r| !r.is_empty());
    Self::new(token, repository)
  }

  /// The open pull request whose head is `branch`, if any
  pub fn find_open_pull_request(&self, branch: &str) -> ActionResult<Option<PullRequest>> {
    let stdout = self.run(&[
      "pr", "list", "--head", branch, "--state", "open", "--json", "number,url", "--limit", "1",
    ])?;
    let pulls: Vec<PullRequest> = serde_json::from_str(stdout.trim()).map_err(|_| {
      ActionError::GitHub(GitHubError::UnexpectedOutput {
        command: "gh pr list".to_string(),
        output: stdout.clone(),
      })
    })?;
    Ok(pulls.into_iter().next())
  }

  /// Open a pull request from `branch` into the default branch
  pub fn create_pull_request(&self, branch: &str, title: &str, body: &str) -> ActionResult<PullRequest> {
    let stdout = self.run(&["pr", "create", "--head", branch, "--title", title, "--body", body])?;
    parse_created_pull_request(&stdout).ok_or_else(|| {
      ActionError::GitHub(GitHubError::UnexpectedOutput {
        command: "gh pr create".to_string(),
        output: stdout,
      })
    })
  }

  pub fn add_assignees(&self, number: u64, assignees: &[String]) -> ActionResult<()> {
    self.edit(number, "--add-assignee", assignees)
  }

  pub fn add_labels(&self, number: u64, labels: &[String]) -> ActionResult<()> {
    self.edit(number, "--add-label", labels)
  }

  fn edit(&self, number: u64, flag: &str, values: &[String]) -> ActionResult<()> {
    if values.is_empty() {
      return Ok(());
    }
    let number = number.to_string();
    let joined = values.join(",");
    self.run(&["pr", "edit", &number, flag, &joined])?;
    Ok(())
  }

  fn run(&self, args: &[&str]) -> ActionResult<String> {
    let mut cmd = Command::new("gh");
    cmd.args(args);
    if let Some(repo) = &self.repository {
      cmd.args(["--repo", repo]);
    }
    if !self.token.is_empty() {
      cmd.env("GH_TOKEN", self.token.expose());
    }
    cmd.env("GH_PROMPT_DISABLED", "1");
    cmd.env("NO_COLOR", "1");

    tracing::debug!(args = ?args, repo = ?self.repository, "running gh");
    let output = cmd.output().map_err(|e| match e.kind() {
      ErrorKind::NotFound => ActionError::GitHub(GitHubError::CliNotFound),
      _ => ActionError::Io(e),
    })?;

    if !output.status.success() {
      return Err(ActionError::GitHub(GitHubError::CommandFailed {
        command: format!("gh {}", args.iter().take(2).copied().collect::<Vec<_>>().join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8(output.stdout)?)
  }
}

/// `gh pr create` prints the new pull request URL as its last line
fn parse_created_pull_request(stdout: &str) -> Option<PullRequest> {
  let url = stdout.lines().map(str::trim).rfind(|line| line.starts_with("http"))?;
  let number = pull_request_number(url)?;
  Some(PullRequest {
    number,
    url: url.to_string(),
  })
}

/// `https://github.com/owner/repo/pull/42` -> 42
fn pull_request_number(url: &str) -> Option<u64> {
  let mut segments = url.trim_end_matches('/').rsplit('/');
  let number = segments.next()?.parse().ok()?;
  (segments.next()? == "pull").then_some(number)
}
