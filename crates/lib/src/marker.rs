//! Managed blocks inside a crontab.
//!
//! A managed block is the region between the lines `# START <marker>` and
//! `# END <marker>`, inclusive. Everything outside it belongs to somebody
//! else and is carried through untouched. Only whole lines equal to a marker
//! line are recognized; nothing else in the table is ever parsed.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::consts::{END_PREFIX, START_PREFIX};

/// Errors that can occur when constructing a marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
  #[error("marker must not be empty")]
  Empty,

  #[error("marker must not contain line breaks: {0:?}")]
  LineBreak(String),
}

/// Identifier of a managed block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
  pub fn new(marker: impl Into<String>) -> Result<Self, MarkerError> {
    let marker = marker.into();
    if marker.is_empty() {
      return Err(MarkerError::Empty);
    }
    if marker.contains(['\n', '\r']) {
      return Err(MarkerError::LineBreak(marker));
    }
    Ok(Self(marker))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The line opening this marker's block, without a newline.
  pub fn start_line(&self) -> String {
    format!("{START_PREFIX}{}", self.0)
  }

  /// The line closing this marker's block, without a newline.
  pub fn end_line(&self) -> String {
    format!("{END_PREFIX}{}", self.0)
  }
}

impl fmt::Display for Marker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for Marker {
  type Err = MarkerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Marker::new(s)
  }
}

/// A marker line with no counterpart. Line numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Dangling {
  StartWithoutEnd { line: usize },
  EndWithoutStart { line: usize },
}

impl fmt::Display for Dangling {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Dangling::StartWithoutEnd { line } => write!(f, "START line {line} has no matching END"),
      Dangling::EndWithoutStart { line } => write!(f, "END line {line} has no matching START"),
    }
  }
}

/// A table with one marker's block taken out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
  /// The table without the block.
  pub remainder: String,

  /// The block as found, from the START line through the END line, with no
  /// trailing newline. `None` when the table carries no complete block.
  pub block: Option<&'a str>,

  /// Set when a marker line was found without its counterpart. Such a table
  /// is treated as carrying no block and `remainder` is the whole document.
  pub dangling: Option<Dangling>,
}

impl Split<'_> {
  pub fn had_block(&self) -> bool {
    self.block.is_some()
  }
}

/// Separate `marker`'s block from the rest of `document`.
///
/// The block is the first START line and the first END line after it.
/// Removing it also removes the END line's newline; if nothing follows the
/// block, one newline before it goes too, since [`render`] put it there.
/// Blocks of other markers are ordinary content.
pub fn split<'a>(document: &'a str, marker: &Marker) -> Split<'a> {
  let start = marker.start_line();
  let end = marker.end_line();

  let mut open: Option<(usize, usize)> = None;
  let mut stray_end: Option<usize> = None;
  let mut offset = 0;

  for (index, line) in document.split_inclusive('\n').enumerate() {
    let number = index + 1;
    let content = line.strip_suffix('\n').unwrap_or(line);
    let next = offset + line.len();

    match open {
      None if content == start => open = Some((offset, number)),
      None if content == end && stray_end.is_none() => stray_end = Some(number),
      Some((begin, _)) if content == end => {
        let before = &document[..begin];
        let after = &document[next..];
        let before = if after.is_empty() {
          before.strip_suffix('\n').unwrap_or(before)
        } else {
          before
        };

        return Split {
          remainder: format!("{before}{after}"),
          block: Some(&document[begin..offset + content.len()]),
          dangling: None,
        };
      }
      _ => {}
    }

    offset = next;
  }

  let dangling = match (open, stray_end) {
    (Some((_, line)), _) => Some(Dangling::StartWithoutEnd { line }),
    (None, Some(line)) => Some(Dangling::EndWithoutStart { line }),
    (None, None) => None,
  };

  Split {
    remainder: document.to_string(),
    block: None,
    dangling,
  }
}

/// Wrap `content` in `marker`'s START and END lines.
///
/// The leading newline keeps the block visually apart from whatever precedes
/// it. `content` is used verbatim; [`crate::install::install`] makes sure it
/// ends with a newline so the END line stands alone.
pub fn render(marker: &Marker, content: &str) -> String {
  format!("\n{}\n{}{}", marker.start_line(), content, marker.end_line())
}
