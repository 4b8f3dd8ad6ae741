use predicates::prelude::*;

use crate::common::{self, stdout_json};

fn fixture_cmd() -> assert_cmd::Command {
  let mut cmd = common::bare_cmd();
  cmd.env("RTR_TEST_DIRECTORY_FILE", test_support::fixture_path("directory.json"));
  cmd
}

#[test]
fn missing_login_is_reported() {
  fixture_cmd()
    .arg("roles")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Missing login"));
}

#[test]
fn credentials_from_environment() {
  let out = fixture_cmd()
    .env("REDMINE_LOGIN", "mikheev")
    .env("REDMINE_PASSWORD", "secret")
    .arg("roles")
    .output()
    .unwrap();
  assert_eq!(stdout_json(&out).as_array().unwrap().len(), 3);
}

#[test]
fn credentials_and_url_from_config_file() {
  let td = test_support::tempdir();
  let path = td.path().join("redmine.toml");
  std::fs::write(&path, "[main]\nurl = \"https://tracker.example/\"\nlogin = \"mikheev\"\npassword = \"secret\"\n").unwrap();

  let out = fixture_cmd()
    .args(["--config", path.to_str().unwrap()])
    .args(["totals", "--total", "Estimated time", "--url-only"])
    .output()
    .unwrap();
  let url = stdout_json(&out)["url"].as_str().unwrap().to_string();
  assert!(url.starts_with("https://tracker.example/issues?"), "url was: {}", url);
}

#[test]
fn missing_command_is_reported() {
  fixture_cmd()
    .args(["--login", "mikheev", "--password", "secret"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide a command"));
}
