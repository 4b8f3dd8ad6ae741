// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch the rendered issue-list HTML page for a query URL
// role: integration/page-fetch
// inputs: Query URL; basic-auth credentials; timeout; env RTR_TEST_ISSUES_HTML / RTR_TEST_ISSUES_HTML_FILE for fixtures
// outputs: Page body as text
// side_effects: One GET per call; no retries
// invariants: A call exceeding the timeout is a TransportFailure
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use crate::config::Credentials;
use crate::error::{ReportError, Result};
use crate::util::basic_auth_header;

pub trait PageFetch {
  fn fetch(&self, url: &str) -> Result<String>;
}

struct HttpPageFetch {
  agent: ureq::Agent,
  auth_header: String,
}

impl PageFetch for HttpPageFetch {
  fn fetch(&self, url: &str) -> Result<String> {
    tracing::debug!(%url, "fetching issues page");

    let resp = self
      .agent
      .get(url)
      .set("Accept", "text/html")
      .set("Authorization", &self.auth_header)
      .call()
      .map_err(|e| super::map_ureq_error(url, "issues", e))?;

    resp.into_string().map_err(|e| ReportError::TransportFailure {
      url: url.to_string(),
      reason: e.to_string(),
    })
  }
}

/// Serves one page for every URL, from `RTR_TEST_ISSUES_HTML` or the file named by
/// `RTR_TEST_ISSUES_HTML_FILE`. Neither set behaves like an unreachable host.
struct EnvPageFetch;

impl PageFetch for EnvPageFetch {
  fn fetch(&self, url: &str) -> Result<String> {
    if let Ok(html) = std::env::var("RTR_TEST_ISSUES_HTML") {
      return Ok(html);
    }

    let failure = |reason: String| ReportError::TransportFailure { url: url.to_string(), reason };
    let path = std::env::var("RTR_TEST_ISSUES_HTML_FILE").map_err(|_| failure("no page fixture".into()))?;

    std::fs::read_to_string(&path).map_err(|e| failure(format!("{}: {}", path, e)))
  }
}

fn env_wants_mock() -> bool {
  std::env::var("RTR_TEST_ISSUES_HTML").is_ok()
    || std::env::var("RTR_TEST_ISSUES_HTML_FILE").is_ok()
    || super::api::env_wants_mock()
}

pub fn build_page_fetch(credentials: &Credentials, timeout: Duration) -> Box<dyn PageFetch> {
  if env_wants_mock() {
    return Box::new(EnvPageFetch);
  }

  Box::new(HttpPageFetch {
    agent: super::build_agent(timeout),
    auth_header: basic_auth_header(&credentials.login, &credentials.password),
  })
}
