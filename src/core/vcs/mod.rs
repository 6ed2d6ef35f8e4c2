pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

/// Everything needed to record one commit
#[derive(Debug, Clone)]
pub struct CommitRequest<'a> {
  pub title: &'a str,
  pub body: &'a str,
  pub author_name: &'a str,
  pub author_email: &'a str,
  /// Key id or fingerprint to sign with (GPG)
  pub signing_key: Option<&'a str>,
}
