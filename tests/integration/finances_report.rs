use jsonschema::validator_for;
use predicates::prelude::*;

use crate::common::{self, stdout_json};

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

#[test]
fn finances_file_conforms_to_schema() {
  let td = test_support::tempdir();
  let out_path = td.path().join("reports").join("finances.json");

  let out = common::redmine_cmd()
    .args([
      "finances",
      "--project",
      "EP-Payments",
      "--project",
      "Dividends",
      "--from-year",
      "2018",
      "--to-year",
      "2019",
      "--out",
      out_path.to_str().unwrap(),
    ])
    .output()
    .unwrap();
  let pointer = stdout_json(&out);
  assert_eq!(pointer["file"], out_path.to_str().unwrap());

  let text = std::fs::read_to_string(&out_path).unwrap();
  let report: serde_json::Value = serde_json::from_str(&text).unwrap();
  compile_schema("finances.schema.json")
    .validate(&report)
    .expect("schema validation failed for finances report");

  // Projects keep the requested order and quarters are chronological in the file.
  let pos = |needle: &str| text.find(needle).unwrap_or_else(|| panic!("{} missing", needle));
  assert!(pos("\"EP-Payments\"") < pos("\"Dividends\""));
  assert!(pos("\"Q4 2018\"") < pos("\"Q1 2019\""));

  assert_eq!(report.as_object().unwrap().len(), 2);
  assert_eq!(report["Dividends"].as_object().unwrap().len(), 8);
  assert!(report["Dividends"].get("Q4 2019").is_some());

  // The page fixture reports cash 1 500,00 and cashless 250.25 for every query.
  assert_eq!(report["EP-Payments"]["Q3 2019"]["EXPENDITURE_USD"], 1750.25);
}

#[test]
fn finances_default_file_name_is_timestamped() {
  let td = test_support::tempdir();

  let out = common::redmine_cmd()
    .current_dir(td.path())
    .args(["finances", "--project", "Dividends", "--from-year", "2021", "--to-year", "2021"])
    .output()
    .unwrap();
  let file = stdout_json(&out)["file"].as_str().unwrap().to_string();

  assert!(file.starts_with("finances "), "file was: {}", file);
  assert!(file.ends_with(".json"), "file was: {}", file);
  assert!(td.path().join(&file).is_file());
}

#[test]
fn finances_unknown_project_fails() {
  let td = test_support::tempdir();

  common::redmine_cmd()
    .current_dir(td.path())
    .args(["finances", "--project", "Nope", "--from-year", "2021", "--to-year", "2021"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no project named \"Nope\""));

  assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 0);
}
