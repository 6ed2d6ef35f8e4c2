//! Terminal and GitHub Actions output

pub mod actions;
pub mod progress;
