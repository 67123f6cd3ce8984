//! Shell-style variable interpolation for crontab templates.
//!
//! Templates reference caller-supplied values by name. Resolution happens
//! once, against a fixed substitution table, and substituted values are never
//! scanned again.
//!
//! # Syntax
//!
//! - `$NAME` - replaced by the value bound to `NAME`
//! - `${NAME}` - same, for names followed by identifier characters
//! - `$$` - a literal `$`; `$$HOME` produces `$HOME` and never looks up `HOME`
//!
//! `NAME` is `[A-Za-z_][A-Za-z0-9_]*`, matched greedily. Any other use of `$`
//! is rejected, so templates that need a shell `$` write `$$`.
//!
//! # Example
//!
//! ```
//! use cron_install_lib::interpolate::interpolate;
//! use cron_install_lib::vars::Substitutions;
//!
//! let mut vars = Substitutions::new();
//! vars.insert("BIN".to_string(), "/usr/local/bin".to_string());
//!
//! let text = interpolate("0 * * * * $BIN/backup $$HOME\n", &vars).unwrap();
//! assert_eq!(text, "0 * * * * /usr/local/bin/backup $HOME\n");
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::vars::Substitutions;

/// A segment of parsed template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text, with `$$` escapes already collapsed.
  Literal(String),

  /// A variable reference and the 1-based line it appears on.
  Variable { name: String, line: usize },
}

/// Errors that can occur while parsing or resolving a template.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
pub enum InterpolateError {
  #[error("missing variable '{name}' referenced on line {line}")]
  MissingVariable { name: String, line: usize },

  #[error("invalid placeholder at line {line}, column {column} (use '$$' for a literal '$')")]
  InvalidPlaceholder { line: usize, column: usize },
}

/// Parse template text into literal and variable segments.
///
/// Adjacent literal text is merged, so a template without references parses
/// into at most one segment.
///
/// # Errors
///
/// Returns [`InterpolateError::InvalidPlaceholder`] for a `$` that starts
/// neither an escape nor a well-formed reference.
pub fn parse(input: &str) -> Result<Vec<Segment>, InterpolateError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();
  let mut line = 1;
  let mut line_start = 0;

  while let Some((pos, ch)) = chars.next() {
    match ch {
      '\n' => {
        literal.push(ch);
        line += 1;
        line_start = pos + 1;
      }
      '$' => {
        let column = input[line_start..pos].chars().count() + 1;
        let invalid = InterpolateError::InvalidPlaceholder { line, column };

        let name = match chars.peek() {
          Some((_, '$')) => {
            chars.next();
            literal.push('$');
            continue;
          }
          Some((_, '{')) => {
            chars.next();
            let name = take_identifier(&mut chars);
            if name.is_empty() || !matches!(chars.next(), Some((_, '}'))) {
              return Err(invalid);
            }
            name
          }
          Some((_, c)) if is_identifier_start(*c) => take_identifier(&mut chars),
          _ => return Err(invalid),
        };

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Variable { name, line });
      }
      _ => literal.push(ch),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Resolve every `$NAME` reference in `text` against `vars`.
///
/// # Errors
///
/// Fails on the first reference with no binding, or on a malformed `$`.
/// Nothing is returned for partially resolved text.
pub fn interpolate(text: &str, vars: &Substitutions) -> Result<String, InterpolateError> {
  let segments = parse(text)?;
  substitute_segments(&segments, vars)
}

/// Resolve pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], vars: &Substitutions) -> Result<String, InterpolateError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Variable { name, line } => {
        let value = vars.get(name).ok_or_else(|| InterpolateError::MissingVariable {
          name: name.clone(),
          line: *line,
        })?;
        result.push_str(value);
      }
    }
  }

  Ok(result)
}

/// List the distinct variable names referenced by `text`, in order of first use.
pub fn variables(text: &str) -> Result<Vec<String>, InterpolateError> {
  let mut names: Vec<String> = Vec::new();

  for segment in parse(text)? {
    if let Segment::Variable { name, .. } = segment {
      if !names.contains(&name) {
        names.push(name);
      }
    }
  }

  Ok(names)
}

fn is_identifier_start(c: char) -> bool {
  c == '_' || c.is_ascii_alphabetic()
}

fn is_identifier_char(c: char) -> bool {
  c == '_' || c.is_ascii_alphanumeric()
}

/// Consume the longest identifier at the cursor; empty if none starts here.
fn take_identifier(chars: &mut Peekable<CharIndices<'_>>) -> String {
  let mut name = String::new();

  while let Some(&(_, c)) = chars.peek() {
    let accepted = if name.is_empty() {
      is_identifier_start(c)
    } else {
      is_identifier_char(c)
    };
    if !accepted {
      break;
    }
    name.push(c);
    chars.next();
  }

  name
}
