//! Run context - build once, pass to the run phases
//!
//! Opens the repository and loads the configuration up front so a bad input
//! fails before any branch is touched.

use crate::core::config::{ActionConfig, ConfigOverrides};
use crate::core::error::ActionResult;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};

/// Everything a `run` needs about the repository
pub struct RunContext {
  /// Working tree root (absolute path)
  pub root: PathBuf,

  /// Resolved configuration
  pub config: ActionConfig,

  pub git: SystemGit,
}

impl RunContext {
  /// Open the repository containing `dir` and load its configuration
  pub fn build(dir: &Path, overrides: &ConfigOverrides) -> ActionResult<Self> {
    let git = SystemGit::open(dir)?;
    let root = git.work_tree().to_path_buf();
    let config = ActionConfig::load(&root, overrides)?;

    tracing::debug!(root = %root.display(), year = config.current_year, "run context ready");
    Ok(Self { root, config, git })
  }
}
