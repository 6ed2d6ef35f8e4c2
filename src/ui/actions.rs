//! GitHub Actions workflow commands and step outputs
//!
//! Outside of Actions every function here is a no-op, so commands can call
//! them unconditionally.

use crate::core::error::{ActionResult, ResultExt};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Whether we run inside a GitHub Actions job
pub fn is_github_actions() -> bool {
  std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Emit an `::error::` annotation
pub fn annotate_error(message: &str) {
  println!("::error::{}", escape_data(message));
}

/// Hide a value from the job log
pub fn add_mask(value: &str) {
  if is_github_actions() && !value.is_empty() {
    println!("::add-mask::{}", escape_data(value));
  }
}

/// A collapsible log group, closed on drop
pub struct Group {
  open: bool,
}

impl Group {
  pub fn start(title: &str) -> Self {
    let open = is_github_actions();
    if open {
      println!("::group::{}", escape_data(title));
    }
    Self { open }
  }
}

impl Drop for Group {
  fn drop(&mut self) {
    if self.open {
      println!("::endgroup::");
    }
  }
}

/// Append a step output to `$GITHUB_OUTPUT`
///
/// Returns `false` when no output file is configured.
pub fn set_output(name: &str, value: &str) -> ActionResult<bool> {
  match std::env::var_os("GITHUB_OUTPUT").filter(|v| !v.is_empty()) {
    Some(path) => {
      write_output(Path::new(&path), name, value)?;
      Ok(true)
    }
    None => {
      tracing::debug!(name, value, "GITHUB_OUTPUT not set, skipping output");
      Ok(false)
    }
  }
}

fn write_output(path: &Path, name: &str, value: &str) -> ActionResult<()> {
  let delimiter = format!("ghadelimiter_{}_{}", std::process::id(), name);
  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("Failed to open {}", path.display()))?;
  file.write_all(format_output(name, value, &delimiter).as_bytes())?;
  Ok(())
}

/// `name=value`, or the heredoc form for values spanning lines
fn format_output(name: &str, value: &str, delimiter: &str) -> String {
  if value.contains('\n') || value.contains('\r') {
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
  } else {
    format!("{name}={value}\n")
  }
}

/// Escape a workflow command message
fn escape_data(value: &str) -> String {
  value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
