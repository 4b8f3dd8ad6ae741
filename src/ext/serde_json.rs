// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path access into Redmine REST payloads (e.g. "user", "memberships.4") with typed extraction
// role: extension/serde_json
// outputs: JsonFetch trait; JsonFetched lookups that deserialize optionally, with a default, or as a required field
// invariants: No panics; missing or null paths are absent; a required miss names the path and the URL it came from
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ReportError, Result};

/// A dotted-path lookup into a payload, remembered so failures can name it.
pub struct JsonFetched<'a, 'p> {
  path: &'p str,
  inner: Option<&'a Value>,
}

impl JsonFetched<'_, '_> {
  /// Present and not `null`.
  pub fn is_present(&self) -> bool {
    matches!(self.inner, Some(v) if !v.is_null())
  }

  pub fn to<T: DeserializeOwned>(&self) -> Option<T> {
    self.inner.and_then(|v| T::deserialize(v).ok())
  }

  pub fn to_or_default<T: DeserializeOwned + Default>(&self) -> T {
    self.to::<T>().unwrap_or_default()
  }

  /// Deserialize as `T` or report the payload from `url` as malformed.
  pub fn required<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
    self.to::<T>().ok_or_else(|| ReportError::UnexpectedResponse {
      url: url.to_string(),
      reason: format!("missing or malformed `{}`", self.path),
    })
  }
}

/// Nested lookup via dotted paths like "user.login"; numeric segments index object keys ("versions.4").
pub trait JsonFetch {
  fn fetch<'p>(&self, path: &'p str) -> JsonFetched<'_, 'p>;
}

impl JsonFetch for Value {
  fn fetch<'p>(&self, path: &'p str) -> JsonFetched<'_, 'p> {
    let inner = path
      .split('.')
      .filter(|k| !k.is_empty())
      .try_fold(self, |cur, key| cur.get(key));

    JsonFetched { path, inner }
  }
}
