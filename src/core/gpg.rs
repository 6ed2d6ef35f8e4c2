//! GPG key import for signed commits
//!
//! The key is imported into the runner's keyring with the system `gpg` binary.
//! When a passphrase is given it is preset in `gpg-agent` so `git commit -S`
//! never prompts.

use crate::core::config::GpgConfig;
use crate::core::error::{ActionError, ActionResult, ValidationError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// A secret key available for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgKey {
  /// Primary key fingerprint, used as the git signing key
  pub fingerprint: String,
  /// Keygrips of the primary key and its subkeys
  pub keygrips: Vec<String>,
  pub user_id: Option<String>,
}

/// Import the configured key and unlock it for the rest of the run
pub fn setup_signing_key(config: &GpgConfig) -> ActionResult<GpgKey> {
  let fingerprint = import_key(config.private_key.expose())?;

  let output = gpg(
    &["--batch", "--with-colons", "--with-keygrip", "--list-secret-keys", &fingerprint],
    None,
  )?;
  let key = parse_secret_keys(&String::from_utf8_lossy(&output.stdout))
    .into_iter()
    .find(|k| k.fingerprint == fingerprint)
    .ok_or_else(|| gpg_error(format!("imported key {} has no secret part", fingerprint)))?;

  if let Some(passphrase) = config.passphrase.as_ref().filter(|p| !p.is_empty()) {
    enable_preset_passphrase()?;
    for keygrip in &key.keygrips {
      preset_passphrase(keygrip, passphrase.expose())?;
    }
  }

  tracing::debug!(fingerprint = %key.fingerprint, keygrips = key.keygrips.len(), "gpg key ready");
  Ok(key)
}

fn import_key(armored: &str) -> ActionResult<String> {
  let output = gpg(&["--batch", "--yes", "--status-fd", "1", "--import"], Some(armored))?;
  parse_imported_fingerprint(&String::from_utf8_lossy(&output.stdout))
    .ok_or_else(|| gpg_error("no secret key found in gpgPrivateKey"))
}

/// Let gpg-agent accept PRESET_PASSPHRASE, then reload it
fn enable_preset_passphrase() -> ActionResult<()> {
  let conf = gnupg_home()?.join("gpg-agent.conf");
  let existing = fs::read_to_string(&conf).unwrap_or_default();

  if !existing.lines().any(|line| line.trim() == "allow-preset-passphrase") {
    if let Some(parent) = conf.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(&conf)?;
    writeln!(file, "allow-preset-passphrase")?;
  }

  agent_command("RELOADAGENT")
}

fn preset_passphrase(keygrip: &str, passphrase: &str) -> ActionResult<()> {
  agent_command(&format!("PRESET_PASSPHRASE {} -1 {}", keygrip, hex_upper(passphrase)))
}

fn agent_command(command: &str) -> ActionResult<()> {
  let output = Command::new("gpg-connect-agent")
    .args([command, "/bye"])
    .output()
    .map_err(|e| gpg_error(format!("failed to run gpg-connect-agent: {}", e)))?;

  // The agent reports protocol errors on stdout with status 0
  let stdout = String::from_utf8_lossy(&output.stdout);
  if !output.status.success() || stdout.lines().any(|l| l.starts_with("ERR")) {
    let verb = command.split_whitespace().next().unwrap_or(command);
    return Err(gpg_error(format!("gpg-agent rejected {}: {}", verb, stdout.trim())));
  }
  Ok(())
}

fn gpg(args: &[&str], stdin: Option<&str>) -> ActionResult<Output> {
  let mut cmd = Command::new("gpg");
  cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
  cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() });

  let mut child = cmd.spawn().map_err(|e| gpg_error(format!("failed to run gpg: {}", e)))?;
  if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
    pipe.write_all(input.as_bytes())?;
  }

  let output = child.wait_with_output()?;
  if !output.status.success() {
    return Err(gpg_error(String::from_utf8_lossy(&output.stderr).trim().to_string()));
  }
  Ok(output)
}

fn gnupg_home() -> ActionResult<PathBuf> {
  if let Some(home) = std::env::var_os("GNUPGHOME").filter(|v| !v.is_empty()) {
    return Ok(PathBuf::from(home));
  }
  std::env::var_os("HOME")
    .map(|home| PathBuf::from(home).join(".gnupg"))
    .ok_or_else(|| gpg_error("neither GNUPGHOME nor HOME is set"))
}

fn gpg_error(message: impl Into<String>) -> ActionError {
  ActionError::Validation(ValidationError::Gpg {
    message: message.into(),
  })
}

/// Fingerprint of the first secret key in `gpg --status-fd` import output
///
/// `IMPORT_OK <flags> <fpr>` where flag bit 16 marks a secret key.
fn parse_imported_fingerprint(status: &str) -> Option<String> {
  status
    .lines()
    .filter_map(|line| line.strip_prefix("[GNUPG:] IMPORT_OK "))
    .filter_map(|rest| {
      let mut parts = rest.split_whitespace();
      let flags: u32 = parts.next()?.parse().ok()?;
      let fingerprint = parts.next()?;
      (flags & 16 != 0).then(|| fingerprint.to_string())
    })
    .next()
}

/// Parse `gpg --with-colons --with-keygrip --list-secret-keys`
fn parse_secret_keys(colons: &str) -> Vec<GpgKey> {
  let mut keys: Vec<GpgKey> = Vec::new();
  // fpr lines follow both sec and ssb records; only the first one after sec is the primary
  let mut expect_primary_fpr = false;

  for line in colons.lines() {
    let fields: Vec<&str> = line.split(':').collect();
    let value = fields.get(9).copied().unwrap_or_default();

    match fields[0] {
      "sec" => {
        keys.push(GpgKey {
          fingerprint: String::new(),
          keygrips: Vec::new(),
          user_id: None,
        });
        expect_primary_fpr = true;
      }
      "ssb" => expect_primary_fpr = false,
      "fpr" if expect_primary_fpr => {
        if let Some(key) = keys.last_mut() {
          key.fingerprint = value.to_string();
        }
        expect_primary_fpr = false;
      }
      "grp" if !value.is_empty() => {
        if let Some(key) = keys.last_mut() {
          key.keygrips.push(value.to_string());
        }
      }
      "uid" if !value.is_empty() => {
        if let Some(key) = keys.last_mut().filter(|k| k.user_id.is_none()) {
          key.user_id = Some(value.to_string());
        }
      }
      _ => {}
    }
  }

  keys.retain(|k| !k.fingerprint.is_empty());
  keys
}

fn hex_upper(value: &str) -> String {
  value.bytes().map(|b| format!("{:02X}", b)).collect()
}
