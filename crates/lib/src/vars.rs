//! Substitution tables.
//!
//! A substitution table maps variable names to the text that replaces them in
//! a template. Tables can be assembled from the process environment, a JSON
//! file of string values, and `NAME=VALUE` assignments; later sources win.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Variable name to replacement text.
pub type Substitutions = BTreeMap<String, String>;

/// Errors that can occur while loading substitutions.
#[derive(Debug, Error)]
pub enum VarsError {
  #[error("failed to read variables file {}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse variables file {}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("variables file {} must contain a JSON object", path.display())]
  NotAnObject { path: PathBuf },

  #[error("variable '{name}' in {} must be a string, number or boolean", path.display())]
  UnsupportedValue { path: PathBuf, name: String },

  #[error("invalid assignment '{0}': expected NAME=VALUE")]
  InvalidAssignment(String),

  #[error("invalid variable name '{0}'")]
  InvalidName(String),
}

/// Returns true if `name` can be referenced as `$name` in a template.
pub fn is_valid_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c == '_' || c.is_ascii_alphabetic() => chars.all(|c| c == '_' || c.is_ascii_alphanumeric()),
    _ => false,
  }
}

/// Parse a `NAME=VALUE` assignment. The value may itself contain `=`.
pub fn parse_assignment(assignment: &str) -> Result<(String, String), VarsError> {
  let (name, value) = assignment
    .split_once('=')
    .ok_or_else(|| VarsError::InvalidAssignment(assignment.to_string()))?;

  if !is_valid_name(name) {
    return Err(VarsError::InvalidName(name.to_string()));
  }

  Ok((name.to_string(), value.to_string()))
}

/// Snapshot the process environment.
///
/// Entries that are not valid UTF-8, or whose names could never be referenced
/// from a template, are skipped.
pub fn from_env() -> Substitutions {
  std::env::vars_os()
    .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
    .filter(|(name, _)| is_valid_name(name))
    .collect()
}

/// Load a JSON object of variables.
///
/// Numbers and booleans are accepted and stored in their JSON spelling;
/// `null`, arrays and nested objects are rejected.
pub fn from_json_file(path: &Path) -> Result<Substitutions, VarsError> {
  let content = std::fs::read_to_string(path).map_err(|source| VarsError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let value: serde_json::Value = serde_json::from_str(&content).map_err(|source| VarsError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let serde_json::Value::Object(map) = value else {
    return Err(VarsError::NotAnObject {
      path: path.to_path_buf(),
    });
  };

  let mut vars = Substitutions::new();
  for (name, value) in map {
    if !is_valid_name(&name) {
      return Err(VarsError::InvalidName(name));
    }
    let text = match value {
      serde_json::Value::String(s) => s,
      serde_json::Value::Number(n) => n.to_string(),
      serde_json::Value::Bool(b) => b.to_string(),
      _ => {
        return Err(VarsError::UnsupportedValue {
          path: path.to_path_buf(),
          name,
        });
      }
    };
    vars.insert(name, text);
  }

  debug!(path = %path.display(), count = vars.len(), "loaded variables file");
  Ok(vars)
}
