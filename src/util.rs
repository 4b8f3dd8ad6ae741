// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for auth headers, timestamped output names, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; clap CommandFactory
// outputs: Header values, file names, man page text
// side_effects: None
// invariants:
// - basic_auth_header is RFC 7617 "Basic base64(login:password)"
// - finances_file_name pattern is stable and locale-independent
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use base64::Engine;
use chrono::{DateTime, Local};
use clap::CommandFactory;

pub fn basic_auth_header(login: &str, password: &str) -> String {
  let raw = format!("{}:{}", login, password);
  format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current local time is used.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Default output name for a finances run, e.g. `finances 2021-12-31 18-00-00.json`.
pub fn finances_file_name(now_opt: Option<DateTime<Local>>) -> String {
  let eff_now = effective_now(now_opt);
  format!("finances {}.json", eff_now.format("%Y-%m-%d %H-%M-%S"))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
