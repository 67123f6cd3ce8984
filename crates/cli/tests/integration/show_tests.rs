//! Show command integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn show_prints_block() {
  let env = TestEnv::with_table("a\n\n# START X\njob\n# END X\n");

  env
    .cmd()
    .args(["show", "--marker", "X"])
    .assert()
    .success()
    .stdout("# START X\njob\n# END X\n");
}

#[test]
#[serial]
fn show_missing_block_fails() {
  let env = TestEnv::with_table("a\n");

  env
    .cmd()
    .args(["show", "--marker", "X", "--user", "bob"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No block 'X' in bob's crontab"));
}

#[test]
#[serial]
fn show_json_reports_null_block() {
  let env = TestEnv::empty();

  env
    .cmd()
    .args(["--output", "json", "show", "--marker", "X"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"block\": null"));
}

#[test]
#[serial]
fn show_json_shorthand_reports_block() {
  let env = TestEnv::with_table("\n# START X\njob\n# END X\n");

  env
    .cmd()
    .args(["--json", "show", "--marker", "X"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"block\": \"# START X\\njob\\n# END X\""));
}
