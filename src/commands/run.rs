use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::config::ConfigOverrides;
use crate::core::context::RunContext;
use crate::core::error::{ActionError, ActionResult, ResultExt};
use crate::core::gpg::setup_signing_key;
use crate::core::vcs::CommitRequest;
use crate::github::{GitHubCli, PullRequest};
use crate::license::apply_transform;
use crate::search::search;
use crate::ui::actions::{Group, add_mask, set_output};
use crate::utils::path_to_git_format;
use serde::Serialize;

/// Options for the run command
#[derive(Debug)]
pub struct RunOptions {
  pub overrides: ConfigOverrides,
  pub remote: String,
  pub no_pull_request: bool,
  pub json: bool,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
  /// Every license already mentions the current year
  NoChanges,
  /// Branch pushed, pull request creation skipped
  Pushed,
  /// Branch pushed to an already open pull request
  PullRequestUpdated,
  /// Branch pushed and a new pull request opened
  PullRequestCreated,
}

/// Summary of a run, printed as JSON with `--json`
#[derive(Debug, Serialize)]
pub struct RunReport {
  pub status: RunStatus,
  pub current_year: u32,
  pub branch_name: String,
  pub files_checked: usize,
  /// Rewritten files, relative to the repository root
  pub updated: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pull_request: Option<PullRequest>,
}

/// Run the full action: update licenses on the year branch, push, open a pull request
pub fn run_action(options: RunOptions) -> ActionResult<()> {
  let current_dir = env::current_dir()?;
  let ctx = RunContext::build(&current_dir, &options.overrides)?;
  let config = &ctx.config;
  let json = options.json;
  let say = |line: String| {
    if !json {
      println!("{}", line);
    }
  };

  add_mask(config.token.expose());
  say(format!(
    "📅 Updating copyright years to {} on '{}'",
    config.current_year, config.branch_name
  ));

  let signing_key = match &config.gpg {
    Some(gpg) => {
      let _group = Group::start("Import GPG key");
      let key = setup_signing_key(gpg)?;
      say(format!(
        "🔐 Signing commits as {}",
        key.user_id.as_deref().unwrap_or(&key.fingerprint)
      ));
      Some(key.fingerprint)
    }
    None => None,
  };

  if !ctx.git.has_remote(&options.remote)? {
    return Err(ActionError::with_help(
      format!("Remote '{}' is not configured", options.remote),
      "Check out the repository with actions/checkout, or pass --remote <name>",
    ));
  }

  {
    let _group = Group::start("Prepare branch");
    if ctx.git.remote_branch_exists(&options.remote, &config.branch_name)? {
      say(format!(
        "🌿 Continuing on existing branch {}/{}",
        options.remote, config.branch_name
      ));
      ctx.git.checkout_remote_branch(&options.remote, &config.branch_name)?;
    } else {
      let base = ctx.git.current_branch()?;
      say(format!("🌿 Creating branch {} from {}", config.branch_name, base));
      ctx.git.create_and_checkout_branch(&config.branch_name)?;
    }
  }

  let files = search(&ctx.root, &config.paths)?;
  let mut updated = Vec::new();
  let mut to_stage: Vec<PathBuf> = Vec::new();
  {
    let _group = Group::start("Update license files");
    // Nothing is written until every file has been transformed
    let mut rewrites = Vec::new();
    for file in &files {
      let absolute = ctx.root.join(file);
      let text =
        fs::read_to_string(&absolute).with_context(|| format!("Failed to read {}", file.display()))?;
      let rewritten =
        apply_transform(config.transform.as_ref(), &text, config.current_year).map_err(|e| e.with_path(file))?;

      if rewritten != text {
        rewrites.push((file, absolute, rewritten));
      } else {
        tracing::debug!(path = %file.display(), "already current");
      }
    }

    for (file, absolute, rewritten) in rewrites {
      fs::write(&absolute, &rewritten).with_context(|| format!("Failed to write {}", file.display()))?;
      say(format!("   ✏️  {}", file.display()));
      updated.push(path_to_git_format(file));
      to_stage.push(file.clone());
    }
    ctx.git.stage(&to_stage)?;
  }

  let mut report = RunReport {
    status: RunStatus::NoChanges,
    current_year: config.current_year,
    branch_name: config.branch_name.clone(),
    files_checked: files.len(),
    updated,
    commit: None,
    pull_request: None,
  };

  if !ctx.git.has_staged_changes()? {
    say("✅ All licenses are up to date, nothing to commit".to_string());
    return finish(&report, json);
  }

  {
    let _group = Group::start("Commit and push");
    let sha = ctx.git.commit(&CommitRequest {
      title: &config.commit.title,
      body: &config.commit.body,
      author_name: &config.commit.author_name,
      author_email: &config.commit.author_email,
      signing_key: signing_key.as_deref(),
    })?;
    say(format!("📝 Committed {}", short_sha(&sha)));

    ctx.git.push_to_remote(&options.remote, &config.branch_name)?;
    say(format!("🚀 Pushed {}/{}", options.remote, config.branch_name));
    report.commit = Some(sha);
    report.status = RunStatus::Pushed;
  }

  if options.no_pull_request {
    say("   Skipping pull request (--no-pull-request)".to_string());
    return finish(&report, json);
  }

  let _group = Group::start("Pull request");
  let gh = GitHubCli::from_env(config.token.clone());
  let pr = match gh.find_open_pull_request(&config.branch_name)? {
    Some(pr) => {
      say(format!("🔁 Updated pull request #{}: {}", pr.number, pr.url));
      report.status = RunStatus::PullRequestUpdated;
      pr
    }
    None => {
      let pr = gh.create_pull_request(
        &config.branch_name,
        &config.pull_request.title,
        &config.pull_request.body,
      )?;
      gh.add_assignees(pr.number, &config.pull_request.assignees)?;
      gh.add_labels(pr.number, &config.pull_request.labels)?;
      say(format!("🎉 Opened pull request #{}: {}", pr.number, pr.url));
      report.status = RunStatus::PullRequestCreated;
      pr
    }
  };
  report.pull_request = Some(pr);

  finish(&report, json)
}

/// Publish step outputs and print the report
fn finish(report: &RunReport, json: bool) -> ActionResult<()> {
  for (name, value) in outputs(report) {
    set_output(name, &value)?;
  }

  if json {
    println!("{}", serde_json::to_string_pretty(report)?);
  }
  Ok(())
}

/// Step outputs of a run; pull request fields are empty when none was touched
fn outputs(report: &RunReport) -> [(&'static str, String); 4] {
  let (number, url) = match &report.pull_request {
    Some(pr) => (pr.number.to_string(), pr.url.clone()),
    None => (String::new(), String::new()),
  };
  [
    ("currentYear", report.current_year.to_string()),
    ("branchName", report.branch_name.clone()),
    ("pullRequestNumber", number),
    ("pullRequestUrl", url),
  ]
}

fn short_sha(sha: &str) -> &str {
  sha.get(..7).unwrap_or(sha)
}
