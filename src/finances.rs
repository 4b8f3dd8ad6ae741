// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Quarterly income/expenditure totals per payment project, saved as a JSON document
// role: report/finances
// inputs: Authenticated Session; project names; inclusive year range
// outputs: FinanceReport { project: { "Q1 2018": {INCOME_RUB, EXPENDITURE_RUB, INCOME_USD, EXPENDITURE_USD} } }
// side_effects: One issues-page fetch per (project, quarter, currency, flow); writes the report file
// invariants:
// - Quarters are calendar quarters, labelled "Q<n> <year>", in chronological order
// - A quarter value is Payment cash + Payment cashless with absent totals counted as 0
// - Projects appear in the order they were requested
// errors: Resolution and session errors propagate; file errors carry the path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::model::{FinanceReport, QuarterFinances};
use crate::session::Session;

/// Subjects of foreign-currency payments contain this stem.
const CURRENCY_MARKER: &str = "валют";
const INCOME_CATEGORY: &str = "Income";
const VALUE_OPTIONS: [&str; 2] = ["Payment cash", "Payment cashless"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarter {
  pub label: String,
  pub start: NaiveDate,
  pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
  Rub,
  Usd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Income,
  Expenditure,
}

/// Calendar quarters of `from_year..=to_year`.
pub fn quarters(from_year: i32, to_year: i32) -> Result<Vec<Quarter>> {
  let mut out = Vec::new();

  for year in from_year..=to_year {
    for q in 0..4u32 {
      let start = NaiveDate::from_ymd_opt(year, q * 3 + 1, 1).ok_or_else(|| anyhow!("year {} out of range", year))?;
      let next = if q == 3 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
      } else {
        NaiveDate::from_ymd_opt(year, q * 3 + 4, 1)
      };
      let end = next
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| anyhow!("year {} out of range", year))?;

      out.push(Quarter { label: format!("Q{} {}", q + 1, start.year()), start, end });
    }
  }

  Ok(out)
}

fn day(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

fn vals(v: &[&str]) -> Vec<String> {
  v.iter().map(|s| s.to_string()).collect()
}

/// One cell of the report: sum of the payment totals under the recipe filters.
pub fn quarter_total(session: &mut Session, project: &str, quarter: &Quarter, currency: Currency, flow: Flow) -> Result<f64> {
  session.clear_filters();
  session.add_filter("Проект", "соответствует", &vals(&[project]))?;
  session.add_filter("Статус", "соответствует", &vals(&["Closed"]))?;
  session.add_filter("Трекер", "соответствует", &vals(&["Payment"]))?;
  session.add_filter("Срок завершения", "между", &[day(quarter.start), day(quarter.end)])?;

  let subject_op = match currency {
    Currency::Rub => "не содержит",
    Currency::Usd => "содержит",
  };
  session.add_filter("Тема", subject_op, &vals(&[CURRENCY_MARKER]))?;

  let category_op = match flow {
    Flow::Income => "соответствует",
    Flow::Expenditure => "не соответствует",
  };
  session.add_filter("Payment category", category_op, &vals(&[INCOME_CATEGORY]))?;

  let totals = session.get_totals(&vals(&VALUE_OPTIONS))?;

  Ok(totals.values().map(|v| v.unwrap_or(0.0)).sum())
}

pub fn collect(session: &mut Session, projects: &[String], quarters: &[Quarter]) -> Result<FinanceReport> {
  let mut report = FinanceReport::new();

  for project in projects {
    let mut per_quarter = IndexMap::new();

    for quarter in quarters {
      let cell = QuarterFinances {
        income_rub: quarter_total(session, project, quarter, Currency::Rub, Flow::Income)?,
        expenditure_rub: quarter_total(session, project, quarter, Currency::Rub, Flow::Expenditure)?,
        income_usd: quarter_total(session, project, quarter, Currency::Usd, Flow::Income)?,
        expenditure_usd: quarter_total(session, project, quarter, Currency::Usd, Flow::Expenditure)?,
      };
      tracing::info!(%project, quarter = %quarter.label, ?cell, "quarter totals");
      per_quarter.insert(quarter.label.clone(), cell);
    }

    report.insert(project.clone(), per_quarter);
  }

  session.clear_filters();

  Ok(report)
}

pub fn write_report(path: &Path, report: &FinanceReport) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  std::fs::write(path, serde_json::to_vec_pretty(report)?).with_context(|| format!("writing {}", path.display()))
}
