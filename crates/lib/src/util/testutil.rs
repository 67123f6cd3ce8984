//! Test utilities for cron-install-lib.
//!
//! Provides a stand-in `crontab` binary: a shell script that keeps its table
//! in a file and logs the arguments of every invocation.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// A fake `crontab` living in a scratch directory.
pub struct FakeCrontab {
  dir: PathBuf,
}

impl FakeCrontab {
  /// Install the script under `root`. No table exists until one is written.
  pub fn new(root: &Path) -> Self {
    let dir = root.join("fake-crontab");
    std::fs::create_dir_all(&dir).unwrap();

    let script = format!(
      r#"#!/bin/sh
dir='{dir}'
echo "$*" >> "$dir/invocations"
for last; do :; done
case "$last" in
  -l)
    if [ -f "$dir/table" ]; then cat "$dir/table"; else echo "no crontab for tester" >&2; exit 1; fi ;;
  -)
    cat > "$dir/table" ;;
  *)
    echo "unexpected arguments: $*" >&2; exit 2 ;;
esac
"#,
      dir = dir.display()
    );
    write_executable(&dir.join("crontab"), &script);

    Self { dir }
  }

  /// Install the script with `text` as the existing table.
  pub fn with_table(root: &Path, text: &str) -> Self {
    let fake = Self::new(root);
    std::fs::write(fake.dir.join("table"), text).unwrap();
    fake
  }

  pub fn bin(&self) -> PathBuf {
    self.dir.join("crontab")
  }

  /// Current table contents.
  pub fn table(&self) -> String {
    std::fs::read_to_string(self.dir.join("table")).unwrap()
  }

  /// Arguments of every invocation so far, one string per call.
  pub fn invocations(&self) -> Vec<String> {
    std::fs::read_to_string(self.dir.join("invocations"))
      .map(|s| s.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }
}

/// A `crontab` that drains stdin, prints `message` to stderr and exits 1.
pub fn failing_crontab(root: &Path, message: &str) -> PathBuf {
  let path = root.join("failing-crontab");
  let script = format!(
    r#"#!/bin/sh
for last; do :; done
if [ "$last" = "-" ]; then cat > /dev/null; fi
echo '{message}' >&2
exit 1
"#
  );
  write_executable(&path, &script);
  path
}

fn write_executable(path: &Path, content: &str) {
  std::fs::write(path, content).unwrap();
  let mut perms = std::fs::metadata(path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms).unwrap();
}
