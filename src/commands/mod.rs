//! CLI commands for license-year
//!
//! - **run**: The full action: update licenses on the year branch, push, open a pull request
//! - **transform**: Local, git-free rewrite of license files (dry run by default)
//! - **dialects**: List the built-in copyright notice dialects

pub mod dialects;
pub mod run;
pub mod transform;

pub use dialects::run_dialects;
pub use run::{RunOptions, run_action};
pub use transform::{TransformOptions, run_transform};
