//! License file discovery
//!
//! Each configured pattern is a glob relative to the repository root. Results
//! are regular files only, relative to the root, sorted and de-duplicated.

use crate::core::error::{ActionError, ActionResult, ResultExt, ValidationError};
use glob::MatchOptions;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// Find the files matched by `patterns` under `root`
///
/// Fails when the patterns match nothing at all.
pub fn search(root: &Path, patterns: &[String]) -> ActionResult<Vec<PathBuf>> {
  let mut found = BTreeSet::new();

  let escaped_root = glob::Pattern::escape(&root.to_string_lossy());

  for pattern in patterns {
    let absolute = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern.trim_start_matches("./"));
    let mut matched = 0usize;

    for entry in glob::glob_with(&absolute, MATCH_OPTIONS).with_context(|| format!("Invalid path pattern '{}'", pattern))? {
      let path = entry?;
      if !path.is_file() {
        continue;
      }
      let relative = path.strip_prefix(root)?.to_path_buf();
      if is_inside_git_dir(&relative) {
        continue;
      }
      matched += 1;
      found.insert(relative);
    }

    tracing::debug!(pattern = %pattern, matched, "path pattern expanded");
  }

  if found.is_empty() {
    return Err(ActionError::Validation(ValidationError::NoFilesMatched {
      patterns: patterns.to_vec(),
    }));
  }

  Ok(found.into_iter().collect())
}

fn is_inside_git_dir(path: &Path) -> bool {
  path.components().any(|c| c.as_os_str() == ".git")
}
