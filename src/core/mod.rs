//! Core engine for license-year runs
//!
//! - **config**: Action inputs, license-year.toml and CLI flags, layered and validated
//! - **context**: Repository + configuration, built once per run
//! - **error**: Error types with contextual help messages and exit codes
//! - **gpg**: Signing key import for signed commits
//! - **vcs**: Git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod gpg;
pub mod vcs;
