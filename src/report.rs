// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run one CLI command against an authenticated session and print its JSON result
// role: processing/orchestrator
// inputs: EffectiveConfig (connection, page timeout, command); optional now for output naming
// outputs: One pretty JSON document on stdout; the finances file on disk
// side_effects: Tracker reads; writes the finances report; prints to stdout
// invariants:
// - Authentication happens before any other tracker call
// - stdout carries exactly one JSON document per successful run
// errors: Session errors are wrapped with the step that failed; resolution errors name the offending filter
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::{Value, json};

use crate::cli::{Command, EffectiveConfig, FilterArg};
use crate::error::ReportError;
use crate::finances;
use crate::redmine::api::build_api;
use crate::redmine::pages::build_page_fetch;
use crate::session::Session;
use crate::util;

pub fn open_session(cfg: &EffectiveConfig) -> Result<Session> {
  let conn = &cfg.connection;
  let api = build_api(&conn.base_url, &conn.credentials)?;
  let pages = build_page_fetch(&conn.credentials, cfg.page_timeout);
  let mut session = Session::new(api, pages, &conn.base_url);

  session
    .auth()
    .with_context(|| format!("authenticating {} at {}", conn.credentials.login, conn.base_url))?;

  Ok(session)
}

fn apply_filter(session: &mut Session, f: &FilterArg) -> Result<()> {
  session.add_filter(&f.name, &f.operator, &f.values).map_err(|e| {
    let context = if e.is_resolution() {
      format!("resolving filter {:?}", format!("{}|{}|{}", f.name, f.operator, f.values.join("|")))
    } else {
      format!("applying filter {:?}", f.name)
    };
    anyhow::Error::new(e).context(context)
  })
}

fn totals_json(session: &mut Session, filters: &[FilterArg], totals: &[String], project: Option<&str>, url_only: bool) -> Result<Value> {
  if let Some(name) = project {
    session
      .set_project(name)
      .with_context(|| format!("selecting project {:?}", name))?;
  }

  for f in filters {
    apply_filter(session, f)?;
  }

  let url = session.query_url(totals)?;

  if url_only {
    return Ok(json!({ "url": url }));
  }

  let values = session.get_totals(totals)?;

  Ok(json!({
    "url": url,
    "projects": session.scope().projects(),
    "filters": session.filters(),
    "totals": values,
  }))
}

fn finances_json(
  session: &mut Session,
  projects: &[String],
  from_year: i32,
  to_year: i32,
  out: Option<&PathBuf>,
  now_opt: Option<DateTime<Local>>,
) -> Result<Value> {
  let quarters = finances::quarters(from_year, to_year)?;
  let report = finances::collect(session, projects, &quarters)?;

  let path = match out {
    Some(p) => p.clone(),
    None => PathBuf::from(util::finances_file_name(now_opt)),
  };
  finances::write_report(&path, &report)?;

  Ok(json!({ "file": path.to_string_lossy() }))
}

fn denied_hint(e: ReportError) -> anyhow::Error {
  let hint = match &e {
    ReportError::PermissionDenied { resource } => Some(format!("listing {} needs an administrator account", resource)),
    _ => None,
  };

  match hint {
    Some(h) => anyhow::Error::new(e).context(h),
    None => e.into(),
  }
}

pub fn run_command(session: &mut Session, command: &Command, now_opt: Option<DateTime<Local>>) -> Result<Value> {
  let v = match command {
    Command::Totals { filters, totals, project, url_only } => {
      totals_json(session, filters, totals, project.as_deref(), *url_only)?
    }
    Command::Projects => serde_json::to_value(session.get_projects()?)?,
    Command::Project { name } => {
      let project = session.get_project(name)?.ok_or_else(|| ReportError::UnknownProject(name.clone()))?;
      serde_json::to_value(project)?
    }
    Command::Versions { project } => serde_json::to_value(session.get_versions_for_project(project)?)?,
    Command::Roles => serde_json::to_value(session.get_roles()?)?,
    Command::Users => serde_json::to_value(session.get_users().map_err(denied_hint)?)?,
    Command::Groups => serde_json::to_value(session.get_groups().map_err(denied_hint)?)?,
    Command::Finances { projects, from_year, to_year, out } => {
      finances_json(session, projects, *from_year, *to_year, out.as_ref(), now_opt)?
    }
  };

  Ok(v)
}

pub fn run(cfg: &EffectiveConfig, now_opt: Option<DateTime<Local>>) -> Result<()> {
  let mut session = open_session(cfg)?;
  let v = run_command(&mut session, &cfg.command, now_opt)?;

  println!("{}", serde_json::to_string_pretty(&v)?);
  Ok(())
}
