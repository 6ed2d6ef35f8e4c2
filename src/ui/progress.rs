//! Progress indicators for file processing
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars.
//! Bars are only drawn on an interactive stderr.

use linya::{Bar, Progress};
use std::io::IsTerminal;
use std::sync::Mutex;

/// Progress bar shared by parallel workers
pub struct FileProgress {
  progress: Mutex<Progress>,
  bar: Bar,
}

impl FileProgress {
  /// Create a new progress bar for file transformations
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Mutex::new(progress),
      bar,
    }
  }

  /// A bar when stderr is a terminal and output is meant for humans
  pub fn for_terminal(total: usize, label: impl Into<String>, json: bool) -> Option<Self> {
    (!json && total > 1 && std::io::stderr().is_terminal()).then(|| Self::new(total, label))
  }

  /// Increment progress by 1
  pub fn inc(&self) {
    if let Ok(mut progress) = self.progress.lock() {
      progress.inc_and_draw(&self.bar, 1);
    }
  }
}
