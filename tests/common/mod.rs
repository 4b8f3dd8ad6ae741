use assert_cmd::Command;

pub const BIN: &str = "redmine-totals";

/// Variables the binary reads; cleared so a developer's shell cannot leak into a run.
const SCRUB: &[&str] = &[
  "REDMINE_URL",
  "REDMINE_LOGIN",
  "REDMINE_PASSWORD",
  "REDMINE_TOTALS_LOG",
  "RTR_TEST_DIRECTORY_JSON",
  "RTR_TEST_DIRECTORY_FILE",
  "RTR_TEST_ISSUES_HTML",
  "RTR_TEST_ISSUES_HTML_FILE",
];

/// The binary with a clean environment and no fixtures.
pub fn bare_cmd() -> Command {
  test_support::cmd_bin(BIN, SCRUB)
}

/// The binary wired to the directory and issues-page fixtures, with credentials.
pub fn redmine_cmd() -> Command {
  let mut cmd = bare_cmd();
  cmd
    .env("RTR_TEST_DIRECTORY_FILE", test_support::fixture_path("directory.json"))
    .env("RTR_TEST_ISSUES_HTML_FILE", test_support::fixture_path("issues_totals.html"))
    .args(["--login", "mikheev", "--password", "secret"]);
  cmd
}

pub fn stdout_json(out: &std::process::Output) -> serde_json::Value {
  assert!(
    out.status.success(),
    "command failed: {}",
    String::from_utf8_lossy(&out.stderr)
  );
  serde_json::from_slice(&out.stdout).expect("stdout is one JSON document")
}
