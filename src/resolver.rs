// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a human-readable (filter, operator, values) triple into a wire-level FilterClause
// role: resolution/name-to-id
// inputs: Filter display name, operator label, raw value labels; directory API; current project scope
// outputs: FilterClause { filter, operator, values }
// side_effects: Directory reads through RedmineApi; project filters push onto the ProjectScope
// invariants:
// - Operator legality and arity are checked before any directory read
// - Identical inputs against an unchanged directory produce identical clauses
// - User and version names are searched in the scoped projects, or every visible project when no scope is active
// errors: Unknown names and arity violations are typed ReportError variants carrying the caller's input
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::catalog::{Arity, Catalog, FilterEntry, Lang, OperatorEntry, ValueSource};
use crate::error::{ReportError, Result};
use crate::model::{FilterClause, IdName};
use crate::redmine::api::RedmineApi;

/// Value a user filter understands as "the account running the query".
pub const CURRENT_USER: &str = "me";

/// Projects activated by project filters since the last clear.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectScope {
  projects: Vec<IdName>,
}

impl ProjectScope {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, project: IdName) {
    if !self.projects.iter().any(|p| p.id == project.id) {
      self.projects.push(project);
    }
  }

  pub fn projects(&self) -> &[IdName] {
    &self.projects
  }

  pub fn is_empty(&self) -> bool {
    self.projects.is_empty()
  }

  pub fn clear(&mut self) {
    self.projects.clear();
  }
}

pub fn resolve(
  api: &dyn RedmineApi,
  scope: &mut ProjectScope,
  filter_name: &str,
  operator_name: &str,
  raw_values: &[String],
) -> Result<FilterClause> {
  let catalog = Catalog::global();

  let filter = catalog
    .lookup_filter(filter_name)
    .ok_or_else(|| ReportError::UnknownFilter(filter_name.to_string()))?;
  let operator = catalog
    .lookup_operator(operator_name)
    .ok_or_else(|| ReportError::UnknownOperator(operator_name.to_string()))?;

  if !filter.allows(operator.key) {
    return Err(ReportError::IllegalOperator {
      filter: filter_name.to_string(),
      operator: operator_name.to_string(),
    });
  }

  let taken = take_values(filter, operator, filter_name, operator_name, raw_values)?;
  let mut values = Vec::with_capacity(taken.len());

  for raw in taken {
    let label = catalog.resolve_value_label(filter.key, raw);
    values.push(resolve_directory_value(api, scope, filter.source, &label)?);
  }

  let clause = FilterClause::new(filter.key, operator.key, values);
  tracing::debug!(
    name = filter.label(Lang::En).unwrap_or(filter.key),
    filter = %clause.filter,
    operator = %clause.operator,
    values = ?clause.values,
    "resolved filter"
  );

  Ok(clause)
}

fn take_values<'a>(
  filter: &FilterEntry,
  operator: &OperatorEntry,
  filter_name: &str,
  operator_name: &str,
  raw_values: &'a [String],
) -> Result<&'a [String]> {
  let wanted = match operator.arity {
    Arity::None => 0,
    Arity::One => 1,
    Arity::Two => 2,
  };

  if raw_values.len() < wanted {
    return Err(match operator.arity {
      Arity::Two => ReportError::MissingRangeBound { filter: filter_name.to_string() },
      _ => ReportError::MissingValue {
        filter: filter_name.to_string(),
        operator: operator_name.to_string(),
      },
    });
  }

  if raw_values.len() > wanted {
    tracing::warn!(
      filter = filter.key,
      operator = operator.key,
      ignored = ?&raw_values[wanted..],
      "extra filter values ignored"
    );
  }

  Ok(&raw_values[..wanted])
}

fn resolve_directory_value(api: &dyn RedmineApi, scope: &mut ProjectScope, source: ValueSource, value: &str) -> Result<String> {
  match source {
    ValueSource::Literal => Ok(value.to_string()),
    ValueSource::User => resolve_user(api, scope, value),
    ValueSource::Version => resolve_version(api, scope, value),
    ValueSource::Project => {
      let project = api
        .list_projects()?
        .into_iter()
        .find(|p| p.name == value)
        .ok_or_else(|| ReportError::UnknownProject(value.to_string()))?;
      let id = project.id.to_string();
      scope.push(IdName { id: project.id, name: project.name });
      Ok(id)
    }
    ValueSource::Group => api
      .list_groups()?
      .into_iter()
      .find(|g| g.name == value)
      .map(|g| g.id.to_string())
      .ok_or_else(|| ReportError::UnknownGroup(value.to_string())),
    ValueSource::Role => api
      .list_roles()?
      .into_iter()
      .find(|r| r.name == value)
      .map(|r| r.id.to_string())
      .ok_or_else(|| ReportError::UnknownRole(value.to_string())),
  }
}

/// Project ids to search: the scope when active, else every visible project.
fn search_projects(api: &dyn RedmineApi, scope: &ProjectScope) -> Result<Vec<u64>> {
  if !scope.is_empty() {
    return Ok(scope.projects().iter().map(|p| p.id).collect());
  }

  Ok(api.list_projects()?.into_iter().map(|p| p.id).collect())
}

fn resolve_user(api: &dyn RedmineApi, scope: &ProjectScope, value: &str) -> Result<String> {
  if value == CURRENT_USER {
    return Ok(value.to_string());
  }

  for project_id in search_projects(api, scope)? {
    let found = api
      .list_memberships(project_id)?
      .into_iter()
      .filter_map(|m| m.user)
      .find(|u| u.name == value);

    if let Some(user) = found {
      return Ok(user.id.to_string());
    }
  }

  Err(ReportError::UnknownUser(value.to_string()))
}

fn resolve_version(api: &dyn RedmineApi, scope: &ProjectScope, value: &str) -> Result<String> {
  for project_id in search_projects(api, scope)? {
    if let Some(version) = api.list_versions(project_id)?.into_iter().find(|v| v.name == value) {
      return Ok(version.id.to_string());
    }
  }

  Err(ReportError::UnknownVersion(value.to_string()))
}
