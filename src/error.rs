// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error taxonomy for filter resolution, session guards and tracker I/O
// role: errors
// outputs: ReportError enum and the crate-wide Result alias
// invariants:
// - Resolution failures carry the human-readable name the caller passed in
// - Transport failures carry the URL that failed, never credentials
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

/// Everything that can go wrong between a filter name and a scraped total.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
  #[error("unknown filter: {0:?}")]
  UnknownFilter(String),

  #[error("unknown operator: {0:?}")]
  UnknownOperator(String),

  /// The operator exists but is not legal for the filter's value type.
  #[error("operator {operator:?} is not allowed for filter {filter:?}")]
  IllegalOperator { filter: String, operator: String },

  #[error("operator {operator:?} on filter {filter:?} needs a value")]
  MissingValue { filter: String, operator: String },

  /// "between" was given fewer than two bounds.
  #[error("range filter {filter:?} needs two bounds")]
  MissingRangeBound { filter: String },

  #[error("no user named {0:?} in the projects in scope")]
  UnknownUser(String),

  #[error("no version named {0:?} in the projects in scope")]
  UnknownVersion(String),

  #[error("no project named {0:?}")]
  UnknownProject(String),

  #[error("no group named {0:?}")]
  UnknownGroup(String),

  #[error("no role named {0:?}")]
  UnknownRole(String),

  #[error("not logged in: call auth first")]
  NotAuthenticated,

  #[error("authentication failed for {url}")]
  AuthenticationFailed { url: String },

  #[error("request to {url} failed: {reason}")]
  TransportFailure { url: String, reason: String },

  /// The account lacks the privilege for a directory listing (HTTP 403).
  #[error("permission denied for {resource}")]
  PermissionDenied { resource: String },

  #[error("unexpected response from {url}: {reason}")]
  UnexpectedResponse { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
  /// True for failures that originate in the name resolution step.
  pub fn is_resolution(&self) -> bool {
    matches!(
      self,
      ReportError::UnknownFilter(_)
        | ReportError::UnknownOperator(_)
        | ReportError::IllegalOperator { .. }
        | ReportError::MissingValue { .. }
        | ReportError::MissingRangeBound { .. }
        | ReportError::UnknownUser(_)
        | ReportError::UnknownVersion(_)
        | ReportError::UnknownProject(_)
        | ReportError::UnknownGroup(_)
        | ReportError::UnknownRole(_)
    )
  }
}
