// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Redmine REST directory collaborator (current user, projects, memberships, versions, roles, users, groups)
// role: integration/redmine-api
// inputs: base URL and basic-auth credentials; env RTR_TEST_DIRECTORY_JSON / RTR_TEST_DIRECTORY_FILE for offline fixtures
// outputs: Typed directory objects from crate::model
// side_effects: Network calls to <base>/*.json; reads a fixture file when RTR_TEST_DIRECTORY_FILE is set
// invariants:
// - Paginated listings are read to the end (limit/offset/total_count)
// - 401 maps to AuthenticationFailed, 403 to PermissionDenied; nothing is retried
// - Nothing is cached between calls
// errors: Returned as ReportError; callers decide whether a failure is fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Credentials;
use crate::error::{ReportError, Result};
use crate::ext::serde_json::JsonFetch;
use crate::model::{Group, Membership, Project, Role, User, Version};
use crate::util::basic_auth_header;

const PAGE_SIZE: u64 = 100;
const API_TIMEOUT: Duration = Duration::from_secs(30);

// --- Trait seam for the Redmine directory ---
pub trait RedmineApi {
  fn current_user(&self) -> Result<User>;
  fn list_projects(&self) -> Result<Vec<Project>>;
  fn get_project(&self, id: u64) -> Result<Project>;
  fn list_memberships(&self, project_id: u64) -> Result<Vec<Membership>>;
  fn list_versions(&self, project_id: u64) -> Result<Vec<Version>>;
  fn list_roles(&self) -> Result<Vec<Role>>;
  /// Admin only; a regular account gets `PermissionDenied`.
  fn list_users(&self) -> Result<Vec<User>>;
  /// Admin only; a regular account gets `PermissionDenied`.
  fn list_groups(&self) -> Result<Vec<Group>>;
}

struct RedmineHttpApi {
  base_url: String,
  auth_header: String,
  agent: ureq::Agent,
}

impl RedmineHttpApi {
  fn new(base_url: &str, credentials: &Credentials) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      auth_header: basic_auth_header(&credentials.login, &credentials.password),
      agent: super::build_agent(API_TIMEOUT),
    }
  }

  fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<(String, Value)> {
    let url = format!("{}/{}", self.base_url, path);
    let mut req = self
      .agent
      .get(&url)
      .set("Accept", "application/json")
      .set("Authorization", &self.auth_header);

    for (k, v) in query {
      req = req.query(k, v);
    }

    tracing::debug!(%url, "redmine api request");

    match req.call() {
      Ok(resp) => {
        let v = resp.into_json::<Value>().map_err(|e| ReportError::UnexpectedResponse {
          url: url.clone(),
          reason: e.to_string(),
        })?;
        Ok((url, v))
      }
      Err(e) => Err(super::map_ureq_error(&url, path, e)),
    }
  }

  /// Read every page of a `limit`/`offset` listing.
  fn get_all<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
    let mut out: Vec<T> = Vec::new();
    let mut offset = 0u64;

    loop {
      let (url, v) = self.get_json(path, &[("limit", PAGE_SIZE.to_string()), ("offset", offset.to_string())])?;
      let page: Vec<T> = v.fetch(key).required(&url)?;
      let total = v.fetch("total_count").to_or_default::<u64>();
      let n = page.len() as u64;

      out.extend(page);
      offset += n;

      if n == 0 || offset >= total {
        break;
      }
    }

    Ok(out)
  }
}

impl RedmineApi for RedmineHttpApi {
  fn current_user(&self) -> Result<User> {
    let (url, v) = self.get_json("users/current.json", &[])?;
    v.fetch("user").required(&url)
  }

  fn list_projects(&self) -> Result<Vec<Project>> {
    self.get_all("projects.json", "projects")
  }

  fn get_project(&self, id: u64) -> Result<Project> {
    let (url, v) = self.get_json(&format!("projects/{}.json", id), &[])?;
    v.fetch("project").required(&url)
  }

  fn list_memberships(&self, project_id: u64) -> Result<Vec<Membership>> {
    self.get_all(&format!("projects/{}/memberships.json", project_id), "memberships")
  }

  fn list_versions(&self, project_id: u64) -> Result<Vec<Version>> {
    let (url, v) = self.get_json(&format!("projects/{}/versions.json", project_id), &[])?;
    v.fetch("versions").required(&url)
  }

  fn list_roles(&self) -> Result<Vec<Role>> {
    let (url, v) = self.get_json("roles.json", &[])?;
    v.fetch("roles").required(&url)
  }

  fn list_users(&self) -> Result<Vec<User>> {
    self.get_all("users.json", "users")
  }

  fn list_groups(&self) -> Result<Vec<Group>> {
    let (url, v) = self.get_json("groups.json", &[])?;
    v.fetch("groups").required(&url)
  }
}

/// Directory served from a JSON document instead of the network.
///
/// Shape: `{"current_user": {..}, "projects": [..], "memberships": {"<project id>": [..]},
/// "versions": {"<project id>": [..]}, "roles": [..], "users": [..], "groups": [..]}`.
/// A missing `users` or `groups` key behaves like an account without the admin privilege.
struct RedmineFixtureApi {
  doc: Value,
}

const FIXTURE_URL: &str = "fixture:";

impl RedmineFixtureApi {
  fn listing<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
    let found = self.doc.fetch(path);
    if !found.is_present() {
      return Ok(Vec::new());
    }
    found.required(FIXTURE_URL)
  }

  fn privileged<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
    let found = self.doc.fetch(key);
    if !found.is_present() {
      return Err(ReportError::PermissionDenied { resource: key.to_string() });
    }
    found.required(FIXTURE_URL)
  }
}

impl RedmineApi for RedmineFixtureApi {
  fn current_user(&self) -> Result<User> {
    self
      .doc
      .fetch("current_user")
      .to::<User>()
      .ok_or_else(|| ReportError::AuthenticationFailed { url: FIXTURE_URL.to_string() })
  }

  fn list_projects(&self) -> Result<Vec<Project>> {
    self.listing("projects")
  }

  fn get_project(&self, id: u64) -> Result<Project> {
    self
      .list_projects()?
      .into_iter()
      .find(|p| p.id == id)
      .ok_or_else(|| ReportError::TransportFailure {
        url: format!("{}projects/{}.json", FIXTURE_URL, id),
        reason: "HTTP 404".to_string(),
      })
  }

  fn list_memberships(&self, project_id: u64) -> Result<Vec<Membership>> {
    self.listing(&format!("memberships.{}", project_id))
  }

  fn list_versions(&self, project_id: u64) -> Result<Vec<Version>> {
    self.listing(&format!("versions.{}", project_id))
  }

  fn list_roles(&self) -> Result<Vec<Role>> {
    self.listing("roles")
  }

  fn list_users(&self) -> Result<Vec<User>> {
    self.privileged("users")
  }

  fn list_groups(&self) -> Result<Vec<Group>> {
    self.privileged("groups")
  }
}

pub(crate) fn env_wants_mock() -> bool {
  std::env::var("RTR_TEST_DIRECTORY_JSON").is_ok() || std::env::var("RTR_TEST_DIRECTORY_FILE").is_ok()
}

fn fixture_from_env() -> anyhow::Result<Value> {
  use anyhow::Context;

  if let Ok(s) = std::env::var("RTR_TEST_DIRECTORY_JSON") {
    return serde_json::from_str(&s).context("parsing RTR_TEST_DIRECTORY_JSON");
  }

  let path = std::env::var("RTR_TEST_DIRECTORY_FILE").context("RTR_TEST_DIRECTORY_FILE not set")?;
  let text = std::fs::read_to_string(&path).with_context(|| format!("reading directory fixture {}", path))?;

  serde_json::from_str(&text).with_context(|| format!("parsing directory fixture {}", path))
}

/// Select the directory backend: env fixtures when present, otherwise HTTP.
pub fn build_api(base_url: &str, credentials: &Credentials) -> anyhow::Result<Box<dyn RedmineApi>> {
  if env_wants_mock() {
    tracing::info!("using directory fixture from environment");
    return Ok(Box::new(RedmineFixtureApi { doc: fixture_from_env()? }));
  }

  Ok(Box::new(RedmineHttpApi::new(base_url, credentials)))
}

// Public constructors for dependency injection in tests.
#[cfg(test)]
pub fn make_fixture_api(doc: Value) -> Box<dyn RedmineApi> {
  Box::new(RedmineFixtureApi { doc })
}

#[cfg(test)]
pub fn make_http_api(base_url: &str, credentials: &Credentials) -> Box<dyn RedmineApi> {
  Box::new(RedmineHttpApi::new(base_url, credentials))
}
