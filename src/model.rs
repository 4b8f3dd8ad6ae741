// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the data model (directory objects, filter clauses, totals, finance rows) shared by session, CLI and report
// role: model/types
// outputs: Serializable structs with stable field names matching Redmine REST payloads where they mirror them
// invariants: Directory structs deserialize from Redmine JSON with unknown fields ignored; FilterClause values keep insertion order
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `{ "id": 3, "name": "..." }` references embedded in Redmine payloads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdName {
  pub id: u64,
  pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
  pub id: u64,
  #[serde(default)]
  pub login: String,
  #[serde(default)]
  pub firstname: String,
  #[serde(default)]
  pub lastname: String,
}

impl User {
  /// Display name in Redmine's default "firstname lastname" format.
  pub fn display_name(&self) -> String {
    format!("{} {}", self.firstname, self.lastname).trim().to_string()
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub identifier: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent: Option<IdName>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Membership {
  pub id: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<IdName>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user: Option<IdName>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group: Option<IdName>,
  #[serde(default)]
  pub roles: Vec<IdName>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Version {
  pub id: u64,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<IdName>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub due_date: Option<String>,
}

pub type Role = IdName;
pub type Group = IdName;

/// A resolved filter: wire key, operator key and wire values.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FilterClause {
  pub filter: String,
  pub operator: String,
  pub values: Vec<String>,
}

impl FilterClause {
  pub fn new(filter: impl Into<String>, operator: impl Into<String>, values: Vec<String>) -> Self {
    Self { filter: filter.into(), operator: operator.into(), values }
  }
}

/// Requested totals option name → scraped value (None when the page did not report it).
pub type Totals = IndexMap<String, Option<f64>>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct QuarterFinances {
  #[serde(rename = "INCOME_RUB")]
  pub income_rub: f64,
  #[serde(rename = "EXPENDITURE_RUB")]
  pub expenditure_rub: f64,
  #[serde(rename = "INCOME_USD")]
  pub income_usd: f64,
  #[serde(rename = "EXPENDITURE_USD")]
  pub expenditure_usd: f64,
}

/// project → quarter label → totals, in the order they were computed.
pub type FinanceReport = IndexMap<String, IndexMap<String, QuarterFinances>>;
