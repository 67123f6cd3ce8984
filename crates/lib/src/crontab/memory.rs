//! In-memory table service.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{Crontab, CrontabError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Read,
  Write,
}

/// One recorded call against a [`MemoryCrontab`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
  pub op: Op,
  pub user: Option<String>,
}

/// Crontabs held in memory, one per principal, with a log of every call.
///
/// `None` addresses the invoking user's table. Reads and writes can be primed
/// to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryCrontab {
  tables: RefCell<BTreeMap<Option<String>, String>>,
  calls: RefCell<Vec<Call>>,
  fail_reads: bool,
  fail_writes: bool,
}

impl MemoryCrontab {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed the table for `user`.
  pub fn with_table(self, user: Option<&str>, text: &str) -> Self {
    self.tables.borrow_mut().insert(user.map(str::to_string), text.to_string());
    self
  }

  pub fn failing_reads(mut self) -> Self {
    self.fail_reads = true;
    self
  }

  pub fn failing_writes(mut self) -> Self {
    self.fail_writes = true;
    self
  }

  /// Current table for `user`; empty if never written.
  pub fn table(&self, user: Option<&str>) -> String {
    self
      .tables
      .borrow()
      .get(&user.map(str::to_string))
      .cloned()
      .unwrap_or_default()
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  pub fn writes(&self) -> usize {
    self.calls.borrow().iter().filter(|c| c.op == Op::Write).count()
  }

  fn record(&self, op: Op, user: Option<&str>) {
    self.calls.borrow_mut().push(Call {
      op,
      user: user.map(str::to_string),
    });
  }
}

impl Crontab for MemoryCrontab {
  fn read(&self, user: Option<&str>) -> Result<String, CrontabError> {
    self.record(Op::Read, user);
    if self.fail_reads {
      return Err(CrontabError::ReadFailed {
        user: user.map(str::to_string),
        code: Some(1),
        stderr: "simulated read failure".to_string(),
      });
    }
    Ok(self.table(user))
  }

  fn write(&self, user: Option<&str>, text: &str) -> Result<(), CrontabError> {
    self.record(Op::Write, user);
    if self.fail_writes {
      return Err(CrontabError::WriteFailed {
        user: user.map(str::to_string),
        code: Some(1),
        stderr: "simulated write failure".to_string(),
      });
    }
    self.tables.borrow_mut().insert(user.map(str::to_string), text.to_string());
    Ok(())
  }
}
