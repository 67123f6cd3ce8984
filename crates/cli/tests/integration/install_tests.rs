//! Install command integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn install_into_empty_crontab() {
  let env = TestEnv::empty();
  let template = env.template("22 22 * * * /usr/local/bin/$P $A $$E\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X", "--var", "P=foo", "--var", "A=bar"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Installed block 'X'"));

  assert_eq!(env.table(), "\n# START X\n22 22 * * * /usr/local/bin/foo bar $E\n# END X\n");
  assert_eq!(env.invocations(), vec!["-l".to_string(), "-".to_string()]);
}

#[test]
#[serial]
fn reinstall_is_idempotent() {
  let env = TestEnv::with_table("MAILTO=ops\n5 4 * * * backup\n");
  let template = env.template("0 * * * * job\n");

  env.cmd().arg("install").arg(&template).args(["-m", "M"]).assert().success();
  let first = env.table();

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["-m", "M"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Updated block 'M'").and(predicate::str::contains("already up to date")));

  assert_eq!(env.table(), first);
}

#[test]
#[serial]
fn update_moves_block_to_end() {
  let env = TestEnv::with_table("\n# START MARK\nold\n# END MARK\n# unrelated\n0 23 1 * * /usr/bin/mail $SPAM\n");
  let template = env.template("\nnew $ARGS\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "MARK", "--var", "ARGS=baz"])
    .assert()
    .success();

  assert_eq!(
    env.table(),
    "\n# unrelated\n0 23 1 * * /usr/bin/mail $SPAM\n\n# START MARK\n\nnew baz\n# END MARK\n"
  );
}

#[test]
#[serial]
fn user_is_passed_to_crontab() {
  let env = TestEnv::empty();
  let template = env.template("\n#nothing\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "MARK", "--user", "bob"])
    .assert()
    .success()
    .stdout(predicate::str::contains("bob's crontab"));

  let invocations = env.invocations();
  assert_eq!(invocations.len(), 2);
  assert!(invocations.iter().all(|args| args.starts_with("-u bob")));
}

#[test]
#[serial]
fn missing_variable_leaves_crontab_untouched() {
  let env = TestEnv::with_table("keep\n");
  let template = env.template("\n# $UNKNOWN\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("UNKNOWN"));

  assert_eq!(env.table(), "keep\n");
  assert!(env.invocations().iter().all(|args| args == "-l"));
}

#[test]
#[serial]
fn env_variables_are_available_with_flag() {
  let env = TestEnv::empty();
  let template = env.template("0 * * * * $CRON_INSTALL_TEST_PROGRAM\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X", "--env"])
    .env("CRON_INSTALL_TEST_PROGRAM", "/opt/run")
    .assert()
    .success();

  assert_eq!(env.table(), "\n# START X\n0 * * * * /opt/run\n# END X\n");
}

#[test]
#[serial]
fn env_variables_are_ignored_without_flag() {
  let env = TestEnv::empty();
  let template = env.template("0 * * * * $CRON_INSTALL_TEST_PROGRAM\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X"])
    .env("CRON_INSTALL_TEST_PROGRAM", "/opt/run")
    .assert()
    .failure()
    .stderr(predicate::str::contains("CRON_INSTALL_TEST_PROGRAM"));
}

#[test]
#[serial]
fn vars_file_supplies_values() {
  let env = TestEnv::empty();
  let template = env.template("$MINUTE * * * * $PROGRAM\n");
  let vars = env.temp.path().join("vars.json");
  std::fs::write(&vars, r#"{"MINUTE": 15, "PROGRAM": "sync"}"#).unwrap();

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X", "--vars-file"])
    .arg(&vars)
    .assert()
    .success();

  assert_eq!(env.table(), "\n# START X\n15 * * * * sync\n# END X\n");
}

#[test]
#[serial]
fn dry_run_prints_without_writing() {
  let env = TestEnv::with_table("keep\n");
  let template = env.template("job\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X", "--dry-run"])
    .assert()
    .success()
    .stdout("keep\n\n# START X\njob\n# END X\n");

  assert_eq!(env.table(), "keep\n");
  assert_eq!(env.invocations(), vec!["-l".to_string()]);
}

#[test]
#[serial]
fn json_output_describes_outcome() {
  let env = TestEnv::empty();
  let template = env.template("job\n");

  let assert = env
    .cmd()
    .args(["--output", "json", "install"])
    .arg(&template)
    .args(["--marker", "X"])
    .assert()
    .success();

  let outcome: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(outcome["marker"], "X");
  assert_eq!(outcome["replaced"], false);
  assert_eq!(outcome["changed"], true);
  assert_eq!(outcome["table"], "\n# START X\njob\n# END X");
}

#[test]
#[serial]
fn stray_start_warns_by_default() {
  let env = TestEnv::with_table("# START X\nhalf\n");
  let template = env.template("job\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X"])
    .assert()
    .success()
    .stderr(predicate::str::contains("no matching END"));

  assert_eq!(env.table(), "# START X\nhalf\n\n# START X\njob\n# END X\n");
}

#[test]
#[serial]
fn stray_start_fails_when_strict() {
  let env = TestEnv::with_table("# START X\nhalf\n");
  let template = env.template("job\n");

  env
    .cmd()
    .arg("install")
    .arg(&template)
    .args(["--marker", "X", "--strict"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed block"));

  assert_eq!(env.table(), "# START X\nhalf\n");
}

#[test]
#[serial]
fn crontab_override_flag_wins_over_env() {
  let env = TestEnv::empty();
  let template = env.template("job\n");

  env
    .cmd()
    .args(["--crontab", "/nonexistent/crontab", "install"])
    .arg(&template)
    .args(["--marker", "X"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("/nonexistent/crontab"));

  assert!(env.invocations().is_empty());
}
