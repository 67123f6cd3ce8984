//! Table service backed by the `crontab` binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{Crontab, CrontabError};
use crate::consts::{CRONTAB_BIN_ENV, DEFAULT_CRONTAB_BIN};

/// Substring of `crontab -l` stderr meaning the principal has no table yet.
const NO_CRONTAB: &str = "no crontab for";

/// Runs `crontab [-u USER] -l` to read and `crontab [-u USER] -` to write.
#[derive(Debug, Clone)]
pub struct CrontabCommand {
  bin: PathBuf,
}

impl CrontabCommand {
  pub fn new(bin: impl Into<PathBuf>) -> Self {
    Self { bin: bin.into() }
  }

  /// Use the binary named by `CRON_INSTALL_CRONTAB`, falling back to `crontab`.
  pub fn from_env() -> Self {
    let bin = std::env::var_os(CRONTAB_BIN_ENV)
      .filter(|v| !v.is_empty())
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_CRONTAB_BIN));
    Self { bin }
  }

  pub fn bin(&self) -> &Path {
    &self.bin
  }

  fn command(&self, user: Option<&str>) -> Command {
    let mut command = Command::new(&self.bin);
    if let Some(user) = user {
      command.arg("-u").arg(user);
    }
    command
  }

  fn bin_name(&self) -> String {
    self.bin.display().to_string()
  }
}

impl Default for CrontabCommand {
  fn default() -> Self {
    Self::new(DEFAULT_CRONTAB_BIN)
  }
}

impl Crontab for CrontabCommand {
  fn read(&self, user: Option<&str>) -> Result<String, CrontabError> {
    debug!(bin = %self.bin.display(), user = ?user, "reading crontab");

    let output = self
      .command(user)
      .arg("-l")
      .output()
      .map_err(|source| CrontabError::Spawn {
        bin: self.bin_name(),
        source,
      })?;

    if output.status.success() {
      return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.contains(NO_CRONTAB) {
      debug!(user = ?user, "no existing crontab");
      return Ok(String::new());
    }

    Err(CrontabError::ReadFailed {
      user: user.map(str::to_string),
      code: output.status.code(),
      stderr,
    })
  }

  /// crontab(1) refuses a table whose last line lacks a newline, so one is
  /// appended when missing.
  fn write(&self, user: Option<&str>, text: &str) -> Result<(), CrontabError> {
    debug!(bin = %self.bin.display(), user = ?user, bytes = text.len(), "writing crontab");

    let mut child = self
      .command(user)
      .arg("-")
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|source| CrontabError::Spawn {
        bin: self.bin_name(),
        source,
      })?;

    let sent = match child.stdin.take() {
      Some(mut stdin) => {
        let mut sent = stdin.write_all(text.as_bytes());
        if sent.is_ok() && !text.is_empty() && !text.ends_with('\n') {
          sent = stdin.write_all(b"\n");
        }
        sent
      }
      None => Ok(()),
    };

    let output = child.wait_with_output().map_err(|source| CrontabError::Spawn {
      bin: self.bin_name(),
      source,
    })?;

    // A crontab that rejects the table may exit before draining stdin; its
    // status is the more useful error.
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(CrontabError::WriteFailed {
        user: user.map(str::to_string),
        code: output.status.code(),
        stderr,
      });
    }

    sent.map_err(|source| CrontabError::Stdin {
      bin: self.bin_name(),
      source,
    })?;

    Ok(())
  }
}
