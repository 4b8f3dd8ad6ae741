use predicates::prelude::*;
use serde_json::json;

use crate::common::{self, stdout_json};

#[test]
fn totals_for_project_and_status() {
  let out = common::redmine_cmd()
    .args([
      "totals",
      "--project",
      "EP-software",
      "--filter",
      "Статус|соответствует|Закрыта",
      "--total",
      "Оценка временных затрат",
      "--total",
      "Payment cash",
      "--total",
      "Spent time",
    ])
    .output()
    .unwrap();
  let v = stdout_json(&out);

  assert_eq!(
    v["totals"],
    json!({"Оценка временных затрат": 12.5, "Payment cash": 1500.0, "Spent time": 7.5})
  );
  assert_eq!(
    v["filters"],
    json!([
      {"filter": "project_id", "operator": "=", "values": ["4"]},
      {"filter": "status_id", "operator": "=", "values": ["5"]}
    ])
  );
}

#[test]
fn url_only_prints_the_exact_query() {
  let out = common::redmine_cmd()
    .args([
      "totals",
      "--project",
      "EP-software",
      "--filter",
      "Тема|содержит|к нашим",
      "--filter",
      "Создано|между|2021-09-09|2021-11-11",
      "--total",
      "Payment cash",
      "--url-only",
    ])
    .output()
    .unwrap();
  let v = stdout_json(&out);

  insta::assert_snapshot!(v["url"].as_str().unwrap(), @"https://ximc.ru/issues?utf8=%E2%9C%93&set_filter=1&sort=id%3Adesc&f%5B%5D=project_id&op%5Bproject_id%5D=%3D&v%5Bproject_id%5D%5B%5D=4&f%5B%5D=subject&op%5Bsubject%5D=~&v%5Bsubject%5D%5B%5D=%D0%BA+%D0%BD%D0%B0%D1%88%D0%B8%D0%BC&f%5B%5D=created_on&op%5Bcreated_on%5D=%3E%3C&v%5Bcreated_on%5D%5B%5D=2021-09-09&v%5Bcreated_on%5D%5B%5D=2021-11-11&t%5B%5D=cf_29");
}

#[test]
fn user_and_version_names_resolve_through_directory() {
  let out = common::redmine_cmd()
    .args([
      "totals",
      "--filter",
      "Назначена|соответствует|Vlad Belov",
      "--filter",
      "Target version|is|Развитие-2018",
      "--total",
      "Estimated time",
      "--url-only",
    ])
    .output()
    .unwrap();
  let url = stdout_json(&out)["url"].as_str().unwrap().to_string();

  assert!(url.contains("&v%5Bassigned_to_id%5D%5B%5D=8"), "url was: {}", url);
  assert!(url.contains("&v%5Bfixed_version_id%5D%5B%5D=21"), "url was: {}", url);
}

#[test]
fn user_outside_project_scope_is_unknown() {
  common::redmine_cmd()
    .args([
      "totals",
      "--project",
      "EP-software",
      "--filter",
      "Assignee|is|Vlad Belov",
      "--total",
      "Estimated time",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no user named \"Vlad Belov\""));
}

#[test]
fn unknown_filter_fails_with_its_name() {
  common::redmine_cmd()
    .args(["totals", "--filter", "Бюджет|соответствует|1", "--total", "Estimated time"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown filter").and(predicate::str::contains("Бюджет")));
}

#[test]
fn one_bound_between_is_rejected() {
  common::redmine_cmd()
    .args(["totals", "--filter", "Created|between|2021-09-09", "--total", "Estimated time"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("needs two bounds"));
}

#[test]
fn unreachable_page_yields_null_totals() {
  let out = common::redmine_cmd()
    .env_remove("RTR_TEST_ISSUES_HTML_FILE")
    .args(["totals", "--total", "Estimated time", "--total", "Payment cashless"])
    .output()
    .unwrap();
  let v = stdout_json(&out);

  assert_eq!(v["totals"], json!({"Estimated time": null, "Payment cashless": null}));
}

#[test]
fn inline_page_fixture_is_honored() {
  let out = common::redmine_cmd()
    .env_remove("RTR_TEST_ISSUES_HTML_FILE")
    .env(
      "RTR_TEST_ISSUES_HTML",
      r#"<p class="query-totals"><span class="total-for-cf-39"><span class="value">42</span></span></p>"#,
    )
    .args(["totals", "--total", "Payment tail"])
    .output()
    .unwrap();

  assert_eq!(stdout_json(&out)["totals"]["Payment tail"], 42.0);
}
