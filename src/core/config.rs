use crate::core::error::{ActionError, ActionResult, ConfigError, ResultExt};
use crate::license::{Dialect, validate_custom_pattern};
use crate::utils::{render_template, split_list};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the current year in branch, commit and PR texts
pub const CURRENT_YEAR_PLACEHOLDER: &str = "{{currentYear}}";

const DEFAULT_PATH: &str = "LICENSE";
const DEFAULT_BRANCH_NAME: &str = "license/copyright-to-{{currentYear}}";
const DEFAULT_COMMIT_TITLE: &str = "docs(license): update copyright year(s)";
const DEFAULT_COMMIT_AUTHOR_NAME: &str = "github-actions";
const DEFAULT_COMMIT_AUTHOR_EMAIL: &str = "github-actions@github.com";
const DEFAULT_PR_TITLE: &str = "Update license copyright year(s)";

/// Raw inputs, as given by one source (config file, action inputs, CLI)
///
/// Every field is optional so sources can be layered. Blank strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionInputs {
  pub token: Option<String>,
  pub path: Option<String>,
  pub transform: Option<String>,
  pub branch_name: Option<String>,
  pub commit_title: Option<String>,
  pub commit_body: Option<String>,
  pub commit_author_name: Option<String>,
  pub commit_author_email: Option<String>,
  pub gpg_private_key: Option<String>,
  pub gpg_passphrase: Option<String>,
  pub pr_title: Option<String>,
  pub pr_body: Option<String>,
  pub assignees: Option<String>,
  pub labels: Option<String>,
}

impl ActionInputs {
  /// Every field paired with its action input name, as declared in action.yml
  fn fields_mut(&mut self) -> [(&'static str, &mut Option<String>); 14] {
    [
      ("token", &mut self.token),
      ("path", &mut self.path),
      ("transform", &mut self.transform),
      ("branchName", &mut self.branch_name),
      ("commitTitle", &mut self.commit_title),
      ("commitBody", &mut self.commit_body),
      ("commitAuthorName", &mut self.commit_author_name),
      ("commitAuthorEmail", &mut self.commit_author_email),
      ("gpgPrivateKey", &mut self.gpg_private_key),
      ("gpgPassphrase", &mut self.gpg_passphrase),
      ("prTitle", &mut self.pr_title),
      ("prBody", &mut self.pr_body),
      ("assignees", &mut self.assignees),
      ("labels", &mut self.labels),
    ]
  }

  /// Read GitHub Action inputs from `INPUT_*` environment variables
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Read action inputs through an arbitrary lookup (the environment in production)
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut inputs = Self::default();
    for (name, field) in inputs.fields_mut() {
      *field = lookup(&input_env_key(name)).filter(|v| !v.trim().is_empty());
    }
    inputs
  }

  /// Parse a license-year.toml document
  pub fn from_toml(content: &str) -> ActionResult<Self> {
    Ok(toml_edit::de::from_str(content)?)
  }

  /// Layer `higher` on top of `self`; set, non-blank fields of `higher` win
  pub fn overlay(mut self, mut higher: ActionInputs) -> Self {
    for ((_, mine), (_, theirs)) in self.fields_mut().into_iter().zip(higher.fields_mut()) {
      if let Some(value) = theirs.take().filter(|v| !v.trim().is_empty()) {
        *mine = Some(value);
      }
    }
    self
  }
}

/// Environment variable the Actions runner uses for an input
///
/// `branchName` becomes `INPUT_BRANCHNAME`, `my input` becomes `INPUT_MY_INPUT`.
pub fn input_env_key(name: &str) -> String {
  format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// A value that must never show up in logs
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn expose(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() { write!(f, "\"\"") } else { write!(f, "\"***\"") }
  }
}

/// Commit settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitConfig {
  pub title: String,
  pub body: String,
  pub author_name: String,
  pub author_email: String,
}

/// GPG signing settings, present when a private key was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgConfig {
  pub private_key: Secret,
  pub passphrase: Option<Secret>,
}

/// Pull request settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestConfig {
  pub title: String,
  pub body: String,
  pub assignees: Vec<String>,
  pub labels: Vec<String>,
}

/// Fully resolved configuration for one run
///
/// Sources, lowest precedence first: defaults, license-year.toml, action inputs, CLI flags.
#[derive(Debug, Clone)]
pub struct ActionConfig {
  pub token: Secret,
  /// Globs relative to the repository root
  pub paths: Vec<String>,
  /// Compiled custom dialect, `None` for built-in detection
  pub transform: Option<Dialect>,
  pub current_year: u32,
  pub branch_name: String,
  pub commit: CommitConfig,
  pub gpg: Option<GpgConfig>,
  pub pull_request: PullRequestConfig,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub config_file: Option<PathBuf>,
  pub path: Option<String>,
  pub transform: Option<String>,
  pub current_year: Option<u32>,
}

impl ActionConfig {
  /// Find config file in search order: license-year.toml, .license-year.toml, .github/license-year.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("license-year.toml"),
      root.join(".license-year.toml"),
      root.join(".github").join("license-year.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load and validate configuration for a repository root
  pub fn load(root: &Path, overrides: &ConfigOverrides) -> ActionResult<Self> {
    let file_inputs = match &overrides.config_file {
      Some(path) => {
        let path = if path.is_absolute() { path.clone() } else { root.join(path) };
        if !path.is_file() {
          return Err(ConfigError::NotFound { path }.into());
        }
        Self::read_file(&path)?
      }
      None => match Self::find_config_path(root) {
        Some(path) => Self::read_file(&path)?,
        None => ActionInputs::default(),
      },
    };

    let cli_inputs = ActionInputs {
      path: overrides.path.clone(),
      transform: overrides.transform.clone(),
      ..Default::default()
    };

    let mut inputs = file_inputs.overlay(ActionInputs::from_env()).overlay(cli_inputs);
    if inputs.token.is_none() {
      inputs.token = ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    }

    let current_year = overrides.current_year.unwrap_or_else(current_year);
    Self::resolve(inputs, current_year)
  }

  fn read_file(path: &Path) -> ActionResult<ActionInputs> {
    tracing::debug!(path = %path.display(), "reading config file");
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    ActionInputs::from_toml(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  /// Apply defaults, render templates and validate
  pub fn resolve(inputs: ActionInputs, current_year: u32) -> ActionResult<Self> {
    if !(1000..=9999).contains(&current_year) {
      return Err(
        ConfigError::InvalidValue {
          name: "currentYear".to_string(),
          reason: format!("{} is not a four-digit year", current_year),
        }
        .into(),
      );
    }

    let paths: Vec<String> = inputs
      .path
      .as_deref()
      .unwrap_or(DEFAULT_PATH)
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(String::from)
      .collect();
    if paths.is_empty() {
      return Err(ConfigError::MissingInput { name: "path".to_string() }.into());
    }

    let transform = validate_custom_pattern(inputs.transform.as_deref().unwrap_or_default())?;

    let render = |value: Option<String>, default: &str| render_template(value.as_deref().unwrap_or(default), current_year);

    let branch_name = render(inputs.branch_name, DEFAULT_BRANCH_NAME).trim().to_string();
    if branch_name.is_empty() {
      return Err(
        ConfigError::MissingInput {
          name: "branchName".to_string(),
        }
        .into(),
      );
    }
    if branch_name.contains(char::is_whitespace) || branch_name.contains("..") {
      return Err(ActionError::Config(ConfigError::InvalidValue {
        name: "branchName".to_string(),
        reason: format!("'{}' is not a valid git branch name", branch_name),
      }));
    }

    let gpg = inputs.gpg_private_key.map(|key| GpgConfig {
      private_key: Secret::new(key),
      passphrase: inputs.gpg_passphrase.map(Secret::new),
    });

    Ok(Self {
      token: Secret::new(inputs.token.unwrap_or_default()),
      paths,
      transform,
      current_year,
      branch_name,
      commit: CommitConfig {
        title: render(inputs.commit_title, DEFAULT_COMMIT_TITLE),
        body: render(inputs.commit_body, ""),
        author_name: inputs
          .commit_author_name
          .unwrap_or_else(|| DEFAULT_COMMIT_AUTHOR_NAME.to_string()),
        author_email: inputs
          .commit_author_email
          .unwrap_or_else(|| DEFAULT_COMMIT_AUTHOR_EMAIL.to_string()),
      },
      gpg,
      pull_request: PullRequestConfig {
        title: render(inputs.pr_title, DEFAULT_PR_TITLE),
        body: render(inputs.pr_body, ""),
        assignees: split_list(inputs.assignees.as_deref().unwrap_or_default()),
        labels: split_list(inputs.labels.as_deref().unwrap_or_default()),
      },
    })
  }
}

/// The calendar year on the local clock
pub fn current_year() -> u32 {
  chrono::Local::now().year().max(0) as u32
}
