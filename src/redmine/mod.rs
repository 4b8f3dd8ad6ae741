// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the remote tracker collaborators (REST directory API, rendered page fetch)
// role: integration/namespace
// outputs: Trait seams plus HTTP and fixture-backed implementations
// invariants: Each collaborator is injected into the session as a trait object; fixtures are selected only via RTR_TEST_* env vars
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod pages;

use crate::error::ReportError;

/// Map a ureq failure onto the error taxonomy. `resource` names what was being read.
pub(crate) fn map_ureq_error(url: &str, resource: &str, err: ureq::Error) -> ReportError {
  match err {
    ureq::Error::Status(401, _) => ReportError::AuthenticationFailed { url: url.to_string() },
    ureq::Error::Status(403, _) => ReportError::PermissionDenied { resource: resource.to_string() },
    ureq::Error::Status(code, _) => ReportError::TransportFailure {
      url: url.to_string(),
      reason: format!("HTTP {}", code),
    },
    ureq::Error::Transport(t) => ReportError::TransportFailure {
      url: url.to_string(),
      reason: t.to_string(),
    },
  }
}

pub(crate) fn build_agent(timeout: std::time::Duration) -> ureq::Agent {
  ureq::AgentBuilder::new()
    .timeout(timeout)
    .user_agent(concat!("redmine-totals/", env!("CARGO_PKG_VERSION")))
    .build()
}
