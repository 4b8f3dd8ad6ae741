use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{self, Connection};

#[derive(Parser, Debug)]
#[command(
    name = "redmine-totals",
    version,
    about = "Query Redmine issue totals by human-readable filters and export them as JSON",
    long_about = None
)]
pub struct Cli {
  /// Tracker base URL (env REDMINE_URL; default https://ximc.ru)
  #[arg(long, global = true)]
  pub url: Option<String>,

  /// Account login (env REDMINE_LOGIN)
  #[arg(long, global = true)]
  pub login: Option<String>,

  /// Account password (env REDMINE_PASSWORD)
  #[arg(long, global = true)]
  pub password: Option<String>,

  /// TOML file with a [main] table holding url/login/password
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Timeout for fetching the rendered issues page
  #[arg(long, global = true, default_value_t = 3)]
  pub timeout_secs: u64,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Sum issue totals for a set of filters
  Totals {
    /// Filter as NAME|OPERATOR|VALUE|VALUE, e.g. "Статус|соответствует|Закрыта" (repeatable; write \| for a literal pipe)
    #[arg(long = "filter", value_parser = parse_filter_arg)]
    filters: Vec<FilterArg>,

    /// Totals option name, e.g. "Estimated time" or "Payment cash" (repeatable)
    #[arg(long = "total", required = true)]
    totals: Vec<String>,

    /// Restrict to one project; applied before the filters
    #[arg(long)]
    project: Option<String>,

    /// Print the query URL instead of fetching the page
    #[arg(long)]
    url_only: bool,
  },

  /// List visible projects
  Projects,

  /// Show one project by name
  Project { name: String },

  /// List versions of a project
  Versions { project: String },

  /// List roles
  Roles,

  /// List users (admin only)
  Users,

  /// List groups (admin only)
  Groups,

  /// Write quarterly income/expenditure totals per project to a JSON file
  Finances {
    /// Project name (repeatable)
    #[arg(long = "project", required = true)]
    projects: Vec<String>,

    #[arg(long)]
    from_year: i32,

    #[arg(long)]
    to_year: i32,

    /// Output file (default: "finances YYYY-MM-DD HH-MM-SS.json" in the current dir)
    #[arg(long)]
    out: Option<PathBuf>,
  },
}

/// One `--filter` occurrence split on unescaped `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
  pub name: String,
  pub operator: String,
  pub values: Vec<String>,
}

/// Split on `|`; `\|` stands for a literal pipe inside a part.
fn split_unescaped(s: &str) -> Vec<String> {
  let mut parts = Vec::new();
  let mut cur = String::new();
  let mut chars = s.chars().peekable();

  while let Some(ch) = chars.next() {
    match ch {
      '\\' if chars.peek() == Some(&'|') => {
        chars.next();
        cur.push('|');
      }
      '|' => parts.push(std::mem::take(&mut cur)),
      _ => cur.push(ch),
    }
  }

  parts.push(cur);
  parts
}

pub fn parse_filter_arg(s: &str) -> std::result::Result<FilterArg, String> {
  let split = split_unescaped(s);
  let mut parts = split.iter().map(|p| p.trim());

  let name = parts.next().filter(|p| !p.is_empty());
  let operator = parts.next().filter(|p| !p.is_empty());

  match (name, operator) {
    (Some(name), Some(operator)) => Ok(FilterArg {
      name: name.to_string(),
      operator: operator.to_string(),
      values: parts.filter(|p| !p.is_empty()).map(String::from).collect(),
    }),
    _ => Err(format!("expected NAME|OPERATOR[|VALUE...], got {:?}", s)),
  }
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub connection: Connection,
  pub page_timeout: Duration,
  pub command: Command,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(command) = cli.command else {
    bail!("Provide a command: totals, projects, project, versions, roles, users, groups, or finances");
  };

  if let Command::Finances { from_year, to_year, .. } = &command {
    if from_year > to_year {
      bail!("--from-year {} is after --to-year {}", from_year, to_year);
    }
  }

  if cli.timeout_secs == 0 {
    bail!("--timeout-secs must be at least 1");
  }

  let connection = config::resolve_connection(cli.url, cli.login, cli.password, cli.config.as_deref())?;

  Ok(EffectiveConfig {
    connection,
    page_timeout: Duration::from_secs(cli.timeout_secs),
    command,
  })
}
