use crate::common;

#[test]
fn cli_generates_man_page() {
  let out = common::bare_cmd().args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.starts_with(".TH"), "expected troff man header");
  assert!(s.contains("redmine\\-totals") || s.contains("redmine-totals"));
}

#[test]
fn gen_man_needs_no_credentials() {
  // No login or password anywhere: man page generation must not touch configuration.
  common::bare_cmd().args(["--gen-man"]).assert().success();
}
