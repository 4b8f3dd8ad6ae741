// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Layer connection settings from CLI flags, environment, and an optional TOML file
// role: config/loading
// inputs: Optional flag values; env REDMINE_URL / REDMINE_LOGIN / REDMINE_PASSWORD; TOML file with a [main] table
// outputs: Connection { base_url, credentials }
// side_effects: Reads the config file when one is given
// invariants: Precedence is flag > env > file; url falls back to DEFAULT_URL; login and password must resolve
// errors: Missing credentials and unreadable files are reported with the source that was tried
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub const DEFAULT_URL: &str = "https://ximc.ru";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub login: String,
  pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
  pub base_url: String,
  pub credentials: Credentials,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
  #[serde(default)]
  main: MainSection,
}

#[derive(Debug, Default, Deserialize)]
struct MainSection {
  url: Option<String>,
  login: Option<String>,
  password: Option<String>,
}

fn load_file(path: &Path) -> Result<MainSection> {
  let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
  let cfg: FileConfig = toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;

  Ok(cfg.main)
}

fn non_empty(v: Option<String>) -> Option<String> {
  v.filter(|s| !s.trim().is_empty())
}

fn from_env(key: &str) -> Option<String> {
  non_empty(std::env::var(key).ok())
}

/// Resolve url/login/password: flag first, then env, then the config file.
pub fn resolve_connection(
  url: Option<String>,
  login: Option<String>,
  password: Option<String>,
  file: Option<&Path>,
) -> Result<Connection> {
  let file_cfg = match file {
    Some(p) => load_file(p)?,
    None => MainSection::default(),
  };

  let base_url = non_empty(url)
    .or_else(|| from_env("REDMINE_URL"))
    .or(non_empty(file_cfg.url))
    .unwrap_or_else(|| DEFAULT_URL.to_string());

  let Some(login) = non_empty(login).or_else(|| from_env("REDMINE_LOGIN")).or(non_empty(file_cfg.login)) else {
    bail!("Missing login. Pass --login, set REDMINE_LOGIN, or add `login` under [main] in --config");
  };

  let Some(password) = non_empty(password)
    .or_else(|| from_env("REDMINE_PASSWORD"))
    .or(non_empty(file_cfg.password))
  else {
    bail!("Missing password. Pass --password, set REDMINE_PASSWORD, or add `password` under [main] in --config");
  };

  Ok(Connection {
    base_url: base_url.trim_end_matches('/').to_string(),
    credentials: Credentials { login, password },
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn clear_env() {
    std::env::remove_var("REDMINE_URL");
    std::env::remove_var("REDMINE_LOGIN");
    std::env::remove_var("REDMINE_PASSWORD");
  }

  #[test]
  #[serial]
  fn flags_win_over_env() {
    clear_env();
    let _env = test_support::with_env(&[("REDMINE_LOGIN", "from-env"), ("REDMINE_PASSWORD", "env-pw")]);
    let c = resolve_connection(None, Some("flag".into()), None, None).unwrap();
    assert_eq!(c.credentials, Credentials { login: "flag".into(), password: "env-pw".into() });
    assert_eq!(c.base_url, DEFAULT_URL);
  }

  #[test]
  #[serial]
  fn env_wins_over_file() {
    clear_env();
    let td = tempfile::TempDir::new().unwrap();
    let path = td.path().join("redmine.toml");
    std::fs::write(&path, "[main]\nlogin = \"file\"\npassword = \"secret\"\n").unwrap();
    let _env = test_support::with_env(&[("REDMINE_LOGIN", "from-env"), ("REDMINE_URL", "http://env.example/")]);
    let c = resolve_connection(None, None, None, Some(&path)).unwrap();
    assert_eq!(c.credentials.login, "from-env");
    assert_eq!(c.credentials.password, "secret");
    assert_eq!(c.base_url, "http://env.example");
  }

  #[test]
  #[serial]
  fn file_fills_gaps() {
    clear_env();
    let td = tempfile::TempDir::new().unwrap();
    let path = td.path().join("redmine.toml");
    std::fs::write(&path, "[main]\nurl = \"https://tracker.example/\"\nlogin = \"vlad\"\npassword = \"secret\"\n").unwrap();
    let c = resolve_connection(None, None, None, Some(&path)).unwrap();
    assert_eq!(c.base_url, "https://tracker.example");
    assert_eq!(c.credentials, Credentials { login: "vlad".into(), password: "secret".into() });
  }

  #[test]
  #[serial]
  fn missing_password_is_an_error() {
    clear_env();
    let err = resolve_connection(None, Some("vlad".into()), None, None).unwrap_err();
    assert!(format!("{:#}", err).contains("Missing password"));
  }

  #[test]
  #[serial]
  fn unreadable_file_names_the_path() {
    let err = resolve_connection(None, None, None, Some(Path::new("/nonexistent/redmine.toml"))).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/redmine.toml"));
  }
}
