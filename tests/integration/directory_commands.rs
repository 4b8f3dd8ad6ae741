use predicates::prelude::*;
use serde_json::json;

use crate::common::{self, stdout_json};

#[test]
fn projects_lists_every_visible_project() {
  let v = stdout_json(&common::redmine_cmd().arg("projects").output().unwrap());
  let names: Vec<&str> = v.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
  assert_eq!(names, ["EP-software", "EP-Payments", "Dividends"]);
}

#[test]
fn project_by_name() {
  let v = stdout_json(&common::redmine_cmd().args(["project", "EP-Payments"]).output().unwrap());
  assert_eq!(v["id"], 12);
  assert_eq!(v["parent"], json!({"id": 4, "name": "EP-software"}));

  common::redmine_cmd()
    .args(["project", "Nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no project named"));
}

#[test]
fn versions_of_a_project() {
  let v = stdout_json(&common::redmine_cmd().args(["versions", "EP-software"]).output().unwrap());
  let names: Vec<&str> = v.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
  assert_eq!(names, ["Развитие-2018", "Развитие-2019"]);

  let v = stdout_json(&common::redmine_cmd().args(["versions", "Dividends"]).output().unwrap());
  assert_eq!(v, json!([]));
}

#[test]
fn roles_listing() {
  let v = stdout_json(&common::redmine_cmd().arg("roles").output().unwrap());
  assert_eq!(v.as_array().unwrap().len(), 3);
  assert_eq!(v[0], json!({"id": 3, "name": "Manager"}));
}

#[test]
fn admin_listings_are_denied_for_regular_accounts() {
  for command in ["users", "groups"] {
    common::redmine_cmd()
      .arg(command)
      .assert()
      .failure()
      .stderr(predicate::str::contains("administrator"));
  }
}

#[test]
fn admin_listings_with_privileged_fixture() {
  let mut doc: serde_json::Value = test_support::read_fixture_json("directory.json");
  doc["users"] = json!([{"id": 7, "login": "dasha", "firstname": "Dasha", "lastname": "Ivanova"}]);
  doc["groups"] = json!([{"id": 15, "name": "Accounting"}]);

  let out = common::redmine_cmd()
    .env_remove("RTR_TEST_DIRECTORY_FILE")
    .env("RTR_TEST_DIRECTORY_JSON", doc.to_string())
    .arg("users")
    .output()
    .unwrap();
  assert_eq!(stdout_json(&out)[0]["login"], "dasha");
}

#[test]
fn failed_authentication_is_fatal() {
  common::redmine_cmd()
    .env_remove("RTR_TEST_DIRECTORY_FILE")
    .env("RTR_TEST_DIRECTORY_JSON", r#"{"projects": []}"#)
    .arg("projects")
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("authentication failed"));
}
