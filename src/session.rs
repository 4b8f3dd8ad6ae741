// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Authenticated tracker session holding the project scope and accumulated filters
// role: orchestration/session
// inputs: RedmineApi and PageFetch collaborators; base URL; filter triples and totals option names
// outputs: Query URLs, Totals, directory listings
// side_effects: Directory and page reads through the injected collaborators
// invariants:
// - Every operation that touches the tracker fails with NotAuthenticated until auth() succeeds
// - clear_filters() also clears the project scope
// - A transport failure while fetching the issues page yields all-None totals
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::catalog::{Catalog, TotalsOption};
use crate::error::{ReportError, Result};
use crate::filters::FilterSet;
use crate::model::{FilterClause, Group, Project, Role, Totals, User, Version};
use crate::redmine::api::RedmineApi;
use crate::redmine::pages::PageFetch;
use crate::resolver::{self, ProjectScope};

pub struct Session {
  api: Box<dyn RedmineApi>,
  pages: Box<dyn PageFetch>,
  base_url: String,
  user: Option<User>,
  scope: ProjectScope,
  filters: FilterSet,
}

impl Session {
  pub fn new(api: Box<dyn RedmineApi>, pages: Box<dyn PageFetch>, base_url: &str) -> Self {
    Self {
      api,
      pages,
      base_url: base_url.trim_end_matches('/').to_string(),
      user: None,
      scope: ProjectScope::new(),
      filters: FilterSet::new(),
    }
  }

  /// Establish the identity of the account; every other tracker call needs it.
  pub fn auth(&mut self) -> Result<&User> {
    let user = self.api.current_user()?;
    tracing::info!(login = %user.login, name = %user.display_name(), "authenticated");
    Ok(&*self.user.insert(user))
  }

  fn require_auth(&self) -> Result<()> {
    match self.user {
      Some(_) => Ok(()),
      None => Err(ReportError::NotAuthenticated),
    }
  }

  /// Start over with a single `project_id` clause for the named project.
  pub fn set_project(&mut self, name: &str) -> Result<()> {
    self.require_auth()?;
    self.clear_filters();
    self.add_filter("project", "is", &[name.to_string()])
  }

  pub fn add_filter(&mut self, filter: &str, operator: &str, values: &[String]) -> Result<()> {
    self.require_auth()?;
    let clause = resolver::resolve(self.api.as_ref(), &mut self.scope, filter, operator, values)?;
    self.filters.add(clause);
    Ok(())
  }

  pub fn clear_filters(&mut self) {
    self.filters.clear();
    self.scope.clear();
  }

  pub fn filters(&self) -> &[FilterClause] {
    self.filters.all()
  }

  pub fn scope(&self) -> &ProjectScope {
    &self.scope
  }

  fn totals_options(options: &[String]) -> Vec<(String, &'static TotalsOption)> {
    let catalog = Catalog::global();

    options
      .iter()
      .filter_map(|name| match catalog.lookup_totals_option(name) {
        Some(opt) => Some((name.clone(), opt)),
        None => {
          tracing::warn!(option = %name, "unknown totals option skipped");
          None
        }
      })
      .collect()
  }

  fn build_url(&self, requested: &[(String, &'static TotalsOption)]) -> String {
    let fields: Vec<&str> = requested.iter().map(|(_, opt)| opt.field).collect();
    crate::query::build(&self.base_url, self.filters.all(), &fields)
  }

  pub fn query_url(&self, options: &[String]) -> Result<String> {
    self.require_auth()?;
    Ok(self.build_url(&Self::totals_options(options)))
  }

  pub fn get_totals(&self, options: &[String]) -> Result<Totals> {
    self.require_auth()?;
    let requested = Self::totals_options(options);
    let url = self.build_url(&requested);
    tracing::debug!(%url, "issues query");

    match self.pages.fetch(&url) {
      Ok(html) => Ok(crate::totals::extract(&html, &requested)),
      Err(ReportError::TransportFailure { url, reason }) => {
        tracing::warn!(%url, %reason, "issues page unavailable; totals left empty");
        Ok(requested.into_iter().map(|(name, _)| (name, None)).collect())
      }
      Err(e) => Err(e),
    }
  }

  pub fn get_projects(&self) -> Result<Vec<Project>> {
    self.require_auth()?;
    self.api.list_projects()
  }

  /// Full project record by exact name, or None when no visible project has it.
  pub fn get_project(&self, name: &str) -> Result<Option<Project>> {
    self.require_auth()?;

    match self.api.list_projects()?.into_iter().find(|p| p.name == name) {
      Some(p) => self.api.get_project(p.id).map(Some),
      None => Ok(None),
    }
  }

  pub fn get_versions_for_project(&self, name: &str) -> Result<Vec<Version>> {
    self.require_auth()?;

    let project = self
      .api
      .list_projects()?
      .into_iter()
      .find(|p| p.name == name)
      .ok_or_else(|| ReportError::UnknownProject(name.to_string()))?;

    self.api.list_versions(project.id)
  }

  pub fn get_roles(&self) -> Result<Vec<Role>> {
    self.require_auth()?;
    self.api.list_roles()
  }

  pub fn get_users(&self) -> Result<Vec<User>> {
    self.require_auth()?;
    self.api.list_users()
  }

  pub fn get_groups(&self) -> Result<Vec<Group>> {
    self.require_auth()?;
    self.api.list_groups()
  }
}
