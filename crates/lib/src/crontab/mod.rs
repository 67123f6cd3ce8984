//! The crontab as an external table service.
//!
//! Installation needs exactly two things from the scheduler: the full current
//! table for a principal, and a way to replace it wholesale. [`Crontab`]
//! captures that capability so the installer never spawns processes itself.
//!
//! - [`CrontabCommand`] drives the system `crontab` binary
//! - [`MemoryCrontab`] keeps the table in memory and records every call

mod command;
mod memory;

use thiserror::Error;

pub use command::CrontabCommand;
pub use memory::{Call, MemoryCrontab, Op};

/// Errors reported by a table service.
#[derive(Debug, Error)]
pub enum CrontabError {
  /// The crontab binary could not be started.
  #[error("failed to run {bin}")]
  Spawn { bin: String, source: std::io::Error },

  /// The new table could not be handed to the crontab binary.
  #[error("failed to send table to {bin}")]
  Stdin { bin: String, source: std::io::Error },

  /// Reading the table failed.
  #[error("reading crontab for {} failed with exit code {code:?}: {stderr}", principal(.user))]
  ReadFailed {
    user: Option<String>,
    code: Option<i32>,
    stderr: String,
  },

  /// Replacing the table failed.
  #[error("writing crontab for {} failed with exit code {code:?}: {stderr}", principal(.user))]
  WriteFailed {
    user: Option<String>,
    code: Option<i32>,
    stderr: String,
  },
}

fn principal(user: &Option<String>) -> &str {
  user.as_deref().unwrap_or("current user")
}

/// Read and replace access to a principal's crontab.
///
/// `user` selects whose table is addressed; `None` means the invoking user.
pub trait Crontab {
  /// Return the full table text, or an empty string when no table exists.
  fn read(&self, user: Option<&str>) -> Result<String, CrontabError>;

  /// Replace the full table text.
  fn write(&self, user: Option<&str>, text: &str) -> Result<(), CrontabError>;
}
