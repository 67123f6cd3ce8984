//! Installing and removing managed blocks.
//!
//! An install reads the template and the current table, interpolates the
//! template, strips the marker's old block from the table and appends the new
//! one. Every failure happens before the single write, so an aborted run never
//! touches the table.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::crontab::{Crontab, CrontabError};
use crate::interpolate::{InterpolateError, interpolate};
use crate::marker::{Dangling, Marker, Split, render, split};
use crate::vars::Substitutions;

/// Errors that can occur while installing or removing a block.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error("failed to read template {}", path.display())]
  TemplateRead { path: PathBuf, source: std::io::Error },

  #[error("failed to interpolate template {}", path.display())]
  Interpolate { path: PathBuf, source: InterpolateError },

  #[error("malformed block for marker '{marker}': {dangling}")]
  MalformedBlock { marker: Marker, dangling: Dangling },

  #[error(transparent)]
  Crontab(#[from] CrontabError),
}

/// What to install, where.
#[derive(Debug, Clone)]
pub struct InstallRequest {
  pub marker: Marker,
  /// Template file whose interpolated content becomes the block body.
  pub template: PathBuf,
  pub substitutions: Substitutions,
  /// Whose table to edit; `None` is the invoking user.
  pub user: Option<String>,
  /// Compute the new table without writing it.
  pub dry_run: bool,
  /// Fail instead of ignoring a START or END line without its counterpart.
  pub strict: bool,
}

impl InstallRequest {
  pub fn new(marker: Marker, template: impl Into<PathBuf>, substitutions: Substitutions) -> Self {
    Self {
      marker,
      template: template.into(),
      substitutions,
      user: None,
      dry_run: false,
      strict: false,
    }
  }

  pub fn with_user(mut self, user: impl Into<String>) -> Self {
    self.user = Some(user.into());
    self
  }
}

/// Result of an install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
  pub marker: Marker,
  pub user: Option<String>,
  /// An earlier block for the marker was found and replaced.
  pub replaced: bool,
  /// The new table differs from the old one.
  pub changed: bool,
  pub dry_run: bool,
  /// Set when a lone marker line was ignored.
  pub dangling: Option<Dangling>,
  /// The full table as written (or as it would be written on a dry run).
  pub table: String,
}

/// What to remove, where.
#[derive(Debug, Clone)]
pub struct RemoveRequest {
  pub marker: Marker,
  pub user: Option<String>,
  pub dry_run: bool,
  pub strict: bool,
}

impl RemoveRequest {
  pub fn new(marker: Marker) -> Self {
    Self {
      marker,
      user: None,
      dry_run: false,
      strict: false,
    }
  }

  pub fn with_user(mut self, user: impl Into<String>) -> Self {
    self.user = Some(user.into());
    self
  }
}

/// Result of a removal.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveOutcome {
  pub marker: Marker,
  pub user: Option<String>,
  /// A block was found. The table is only written when this is true.
  pub removed: bool,
  pub dry_run: bool,
  pub dangling: Option<Dangling>,
  pub table: String,
}

/// Install or refresh `request.marker`'s block in the table.
///
/// Reads the table once and writes it once (unless `dry_run`). Running the
/// same request twice leaves the table byte-identical to the first run.
///
/// # Errors
///
/// - [`InstallError::TemplateRead`] if the template cannot be read
/// - [`InstallError::Interpolate`] on an unbound or malformed reference
/// - [`InstallError::MalformedBlock`] on a lone marker line in strict mode
/// - [`InstallError::Crontab`] if the table service fails
pub fn install(crontab: &impl Crontab, request: &InstallRequest) -> Result<InstallOutcome, InstallError> {
  let template = read_template(&request.template)?;
  let user = request.user.as_deref();

  let current = crontab.read(user)?;

  let content = interpolate(&template, &request.substitutions).map_err(|source| InstallError::Interpolate {
    path: request.template.clone(),
    source,
  })?;

  let content = terminate_last_line(content);

  let split = split(&current, &request.marker);
  let dangling = check_dangling(&request.marker, &split, request.strict)?;
  debug!(marker = %request.marker, replaced = split.had_block(), "split existing table");

  let block = render(&request.marker, &content);
  let table = compose(&split.remainder, &block);
  let changed = !same_table(&current, &table);

  if request.dry_run {
    info!(marker = %request.marker, user = ?user, changed, "dry run, crontab not written");
  } else {
    crontab.write(user, &table)?;
    info!(marker = %request.marker, user = ?user, replaced = split.had_block(), changed, "installed block");
  }

  Ok(InstallOutcome {
    marker: request.marker.clone(),
    user: request.user.clone(),
    replaced: split.had_block(),
    changed,
    dry_run: request.dry_run,
    dangling,
    table,
  })
}

/// Remove `request.marker`'s block from the table.
///
/// The table is written only when a block was found.
pub fn remove(crontab: &impl Crontab, request: &RemoveRequest) -> Result<RemoveOutcome, InstallError> {
  let user = request.user.as_deref();
  let current = crontab.read(user)?;

  let split = split(&current, &request.marker);
  let dangling = check_dangling(&request.marker, &split, request.strict)?;
  let removed = split.had_block();

  if !removed {
    info!(marker = %request.marker, user = ?user, "no block to remove");
  } else if request.dry_run {
    info!(marker = %request.marker, user = ?user, "dry run, crontab not written");
  } else {
    crontab.write(user, &split.remainder)?;
    info!(marker = %request.marker, user = ?user, "removed block");
  }

  Ok(RemoveOutcome {
    marker: request.marker.clone(),
    user: request.user.clone(),
    removed,
    dry_run: request.dry_run,
    dangling,
    table: split.remainder,
  })
}

/// Return the installed block for `marker`, marker lines included.
///
/// A lone START or END line is logged and reported as no block.
pub fn show(crontab: &impl Crontab, user: Option<&str>, marker: &Marker) -> Result<Option<String>, CrontabError> {
  let current = crontab.read(user)?;
  let split = split(&current, marker);
  if let Some(dangling) = split.dangling {
    warn!(marker = %marker, "{dangling}; treating the crontab as having no block");
  }
  Ok(split.block.map(str::to_string))
}

/// Append-at-end rule: the refreshed block always goes after everything else.
///
/// A replaced block does not keep its old position. Keeping the block last
/// is what makes installs idempotent: stripping it again yields the same
/// remainder, and appending the same block to that remainder yields the same
/// table.
fn compose(remainder: &str, block: &str) -> String {
  format!("{remainder}{block}")
}

/// The END line must start a line of its own, otherwise the next run cannot
/// find it and appends a second block.
fn terminate_last_line(mut content: String) -> String {
  if !content.is_empty() && !content.ends_with('\n') {
    content.push('\n');
  }
  content
}

fn read_template(path: &Path) -> Result<String, InstallError> {
  std::fs::read_to_string(path).map_err(|source| InstallError::TemplateRead {
    path: path.to_path_buf(),
    source,
  })
}

/// A lone START or END line means the table carries no block for the marker.
/// Strict mode refuses to paper over it.
fn check_dangling(marker: &Marker, split: &Split<'_>, strict: bool) -> Result<Option<Dangling>, InstallError> {
  let Some(dangling) = split.dangling else {
    return Ok(None);
  };

  if strict {
    return Err(InstallError::MalformedBlock {
      marker: marker.clone(),
      dangling,
    });
  }

  warn!(marker = %marker, "{dangling}; treating the crontab as having no block");
  Ok(Some(dangling))
}

/// crontab(1) hands back tables with a final newline even when written
/// without one.
fn same_table(a: &str, b: &str) -> bool {
  a.strip_suffix('\n').unwrap_or(a) == b.strip_suffix('\n').unwrap_or(b)
}
