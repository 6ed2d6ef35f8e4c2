use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{ActionConfig, ConfigOverrides};
use crate::core::error::{ActionError, ActionResult, TransformError};
use crate::license::{Dialect, transform};
use crate::search::search;
use crate::ui::progress::FileProgress;
use crate::utils::path_to_git_format;
use rayon::prelude::*;
use serde::Serialize;

/// What happened (or would happen) to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
  /// Rewritten on disk
  Updated,
  /// Needs an update (dry run)
  Outdated,
  /// Already mentions the current year
  Current,
  /// No recognizable copyright notice
  Unsupported,
}

#[derive(Debug, Serialize)]
pub struct FileOutcome {
  pub path: String,
  pub status: FileStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dialect: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TransformReport {
  pub current_year: u32,
  pub applied: bool,
  pub files: Vec<FileOutcome>,
}

/// Options for the transform command
#[derive(Debug, Default)]
pub struct TransformOptions {
  pub files: Vec<PathBuf>,
  pub overrides: ConfigOverrides,
  pub apply: bool,
  pub json: bool,
}

/// Rewrite copyright years in local files, without git
///
/// Dry run unless `apply` is set. Files are independent, so they are processed in parallel.
pub fn run_transform(options: TransformOptions) -> ActionResult<()> {
  let root = env::current_dir()?;
  let config = ActionConfig::load(&root, &options.overrides)?;

  let files = if options.files.is_empty() {
    search(&root, &config.paths)?
  } else {
    options.files.clone()
  };

  if !options.json {
    let mode = if options.apply { "" } else { " (dry run)" };
    println!(
      "📅 Checking {} file(s) against {}{}",
      files.len(),
      config.current_year,
      mode
    );
  }

  let progress = FileProgress::for_terminal(files.len(), "Transforming", options.json);
  let results: Vec<ActionResult<FileOutcome>> = files
    .par_iter()
    .map(|file| {
      let outcome = transform_file(&root, file, config.transform.as_ref(), config.current_year, options.apply);
      if let Some(p) = &progress {
        p.inc();
      }
      outcome
    })
    .collect();

  // I/O failures abort; unsupported files are reported, then fail the command
  let files = results.into_iter().collect::<ActionResult<Vec<_>>>()?;
  let report = TransformReport {
    current_year: config.current_year,
    applied: options.apply,
    files,
  };

  if options.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  match report.files.iter().find(|f| f.status == FileStatus::Unsupported) {
    Some(file) => Err(ActionError::Transform(TransformError::UnsupportedLicense {
      path: Some(PathBuf::from(&file.path)),
    })),
    None => Ok(()),
  }
}

fn transform_file(
  root: &Path,
  file: &Path,
  custom: Option<&Dialect>,
  current_year: u32,
  apply: bool,
) -> ActionResult<FileOutcome> {
  let absolute = root.join(file);
  let text = fs::read_to_string(&absolute)
    .map_err(|e| ActionError::from(e).context(format!("Failed to read {}", file.display())))?;
  let path = path_to_git_format(file);

  let result = match transform(custom, &text, current_year) {
    Ok(result) => result,
    Err(TransformError::UnsupportedLicense { .. }) => {
      tracing::warn!(path = %path, "no copyright notice recognized");
      return Ok(FileOutcome {
        path,
        status: FileStatus::Unsupported,
        dialect: None,
        from: None,
      });
    }
    Err(e) => return Err(e.into()),
  };

  let status = match (result.is_changed(), apply) {
    (false, _) => FileStatus::Current,
    (true, false) => FileStatus::Outdated,
    (true, true) => {
      fs::write(&absolute, result.text.as_bytes())
        .map_err(|e| ActionError::from(e).context(format!("Failed to write {}", file.display())))?;
      FileStatus::Updated
    }
  };

  Ok(FileOutcome {
    path,
    status,
    dialect: Some(result.dialect),
    from: Some(result.from),
  })
}

fn print_report(report: &TransformReport) {
  for file in &report.files {
    let dialect = file.dialect.unwrap_or("-");
    match file.status {
      FileStatus::Updated => println!("   ✅ {} updated ({})", file.path, dialect),
      FileStatus::Outdated => println!("   ✏️  {} would be updated ({})", file.path, dialect),
      FileStatus::Current => println!("   ✓  {} is current ({})", file.path, dialect),
      FileStatus::Unsupported => println!("   ❌ {} has no recognized copyright notice", file.path),
    }
  }

  let outdated = report
    .files
    .iter()
    .filter(|f| f.status == FileStatus::Outdated)
    .count();
  if outdated > 0 {
    println!("\n💡 Re-run with --apply to write {} file(s).", outdated);
  }
}
