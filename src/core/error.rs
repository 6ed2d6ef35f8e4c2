//! Error types for license-year with contextual messages and exit codes
//!
//! Every failure of a run ends up as an [`ActionError`]. Each category maps to an
//! exit code and, where there is something useful to say, a help message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for license-year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid inputs, unsupported license text)
  User = 1,
  /// System error (git, gh, I/O)
  System = 2,
  /// Validation failure (no files matched, GPG key rejected)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for license-year
#[derive(Debug)]
pub enum ActionError {
  /// Configuration and input errors
  Config(ConfigError),

  /// Copyright-year transformation errors
  Transform(TransformError),

  /// Git operation errors
  Git(GitError),

  /// GitHub (gh CLI) errors
  GitHub(GitHubError),

  /// Validation errors (file search, GPG)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ActionError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ActionError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ActionError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are turned into messages so the context is not lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ActionError::Message { message, context, help } => ActionError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ActionError::Io(err) => ActionError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ActionError::Config(_) => ExitCode::User,
      ActionError::Transform(_) => ExitCode::User,
      ActionError::Git(_) => ExitCode::System,
      ActionError::GitHub(_) => ExitCode::System,
      ActionError::Validation(_) => ExitCode::Validation,
      ActionError::Io(_) => ExitCode::System,
      ActionError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ActionError::Config(e) => e.help_message(),
      ActionError::Transform(e) => e.help_message(),
      ActionError::Git(e) => e.help_message(),
      ActionError::GitHub(e) => e.help_message(),
      ActionError::Validation(e) => e.help_message(),
      ActionError::Message { help, .. } => help.clone(),
      ActionError::Io(_) => None,
    }
  }
}

impl fmt::Display for ActionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ActionError::Config(e) => write!(f, "{}", e),
      ActionError::Transform(e) => write!(f, "{}", e),
      ActionError::Git(e) => write!(f, "{}", e),
      ActionError::GitHub(e) => write!(f, "{}", e),
      ActionError::Validation(e) => write!(f, "{}", e),
      ActionError::Io(e) => write!(f, "I/O error: {}", e),
      ActionError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ActionError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ActionError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ActionError {
  fn from(err: io::Error) -> Self {
    ActionError::Io(err)
  }
}

impl From<String> for ActionError {
  fn from(msg: String) -> Self {
    ActionError::message(msg)
  }
}

impl From<&str> for ActionError {
  fn from(msg: &str) -> Self {
    ActionError::message(msg)
  }
}

impl From<TransformError> for ActionError {
  fn from(err: TransformError) -> Self {
    ActionError::Transform(err)
  }
}

impl From<ConfigError> for ActionError {
  fn from(err: ConfigError) -> Self {
    ActionError::Config(err)
  }
}

impl From<toml_edit::de::Error> for ActionError {
  fn from(err: toml_edit::de::Error) -> Self {
    ActionError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ActionError {
  fn from(err: serde_json::Error) -> Self {
    ActionError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ActionError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ActionError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<glob::PatternError> for ActionError {
  fn from(err: glob::PatternError) -> Self {
    ActionError::message(format!("Invalid glob pattern: {}", err))
  }
}

impl From<glob::GlobError> for ActionError {
  fn from(err: glob::GlobError) -> Self {
    ActionError::message(format!("Glob traversal error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ActionError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ActionError::message(format!("Path strip prefix error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// Required input missing or blank
  MissingInput { name: String },

  /// Input present but unusable
  InvalidValue { name: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Drop the --config flag to use license-year.toml discovery and action inputs.".to_string())
      }
      ConfigError::MissingInput { name } => Some(format!(
        "Set `{}` in the workflow `with:` block or in license-year.toml.",
        name
      )),
      ConfigError::InvalidValue { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => write!(f, "Config file not found: {}", path.display()),
      ConfigError::MissingInput { name } => write!(f, "Missing required input: {}", name),
      ConfigError::InvalidValue { name, reason } => write!(f, "Invalid input '{}': {}", name, reason),
    }
  }
}

/// Copyright-year transformation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
  /// The `transform` input does not compile or lacks a `from` group
  InvalidCustomPattern { pattern: String, reason: String },

  /// Neither the custom pattern nor a built-in dialect matched
  UnsupportedLicense { path: Option<PathBuf> },
}

impl TransformError {
  /// Attach the file that failed to match
  pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
    match self {
      TransformError::UnsupportedLicense { .. } => TransformError::UnsupportedLicense {
        path: Some(path.into()),
      },
      other => other,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      TransformError::InvalidCustomPattern { .. } => Some(
        "Use a regular expression without look-around that names the start year, e.g. `Copyright (?<from>\\d{4})`."
          .to_string(),
      ),
      TransformError::UnsupportedLicense { .. } => Some(
        "Run `license-year dialects` to list supported notices, or set the `transform` input to a custom pattern."
          .to_string(),
      ),
    }
  }
}

impl fmt::Display for TransformError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransformError::InvalidCustomPattern { pattern, reason } => {
        write!(f, "Invalid custom transform '{}': {}", pattern, reason)
      }
      TransformError::UnsupportedLicense { path: Some(path) } => {
        write!(f, "Unsupported license: no copyright notice recognized in {}", path.display())
      }
      TransformError::UnsupportedLicense { path: None } => {
        write!(f, "Unsupported license: no copyright notice recognized")
      }
    }
  }
}

impl std::error::Error for TransformError {}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Branch operation failed
  BranchError { message: String },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote branch moved since it was fetched. Re-run the action to rebase on it.".to_string())
        } else if reason.contains("Permission") || reason.contains("403") {
          Some("The workflow token needs `contents: write` permission to push branches.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Check out the repository first (actions/checkout) or check the path: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::BranchError { message } => {
        write!(f, "Branch operation failed: {}", message)
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// GitHub errors (surfaced by the gh CLI)
#[derive(Debug)]
pub enum GitHubError {
  /// gh is not installed or not on PATH
  CliNotFound,

  /// gh exited unsuccessfully
  CommandFailed { command: String, stderr: String },

  /// gh output could not be understood
  UnexpectedOutput { command: String, output: String },
}

impl GitHubError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitHubError::CliNotFound => {
        Some("Install the GitHub CLI (https://cli.github.com) or pass --no-pull-request.".to_string())
      }
      GitHubError::CommandFailed { stderr, .. } if stderr.contains("HTTP 403") || stderr.contains("401") => {
        Some("The token needs `pull-requests: write` permission.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitHubError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitHubError::CliNotFound => write!(f, "GitHub CLI (gh) not found"),
      GitHubError::CommandFailed { command, stderr } => write!(f, "gh command failed: {}\n{}", command, stderr),
      GitHubError::UnexpectedOutput { command, output } => {
        write!(f, "Unexpected output from {}: {}", command, output)
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// No file matched the configured globs
  NoFilesMatched { patterns: Vec<String> },

  /// GPG key import or agent setup failed
  Gpg { message: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::NoFilesMatched { .. } => {
        Some("Paths are globs relative to the repository root, one per line (default: LICENSE).".to_string())
      }
      ValidationError::Gpg { .. } => {
        Some("Export the key with `gpg --armor --export-secret-keys <id>` and store it as a secret.".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::NoFilesMatched { patterns } => {
        write!(f, "No files matched: {}", patterns.join(", "))
      }
      ValidationError::Gpg { message } => write!(f, "GPG setup failed: {}", message),
    }
  }
}

/// Result type alias for license-year
pub type ActionResult<T> = Result<T, ActionError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ActionResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ActionResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ActionError>,
{
  fn context(self, ctx: impl Into<String>) -> ActionResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ActionResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
///
/// Under GitHub Actions the error is also emitted as an `::error::` annotation.
pub fn print_error(error: &ActionError) {
  if crate::ui::actions::is_github_actions() {
    crate::ui::actions::annotate_error(&error.to_string());
  }

  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ActionError
impl From<anyhow::Error> for ActionError {
  fn from(err: anyhow::Error) -> Self {
    ActionError::message(err.to_string())
  }
}
