use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod catalog;
mod cli;
mod config;
mod error;
mod ext;
mod filters;
mod finances;
mod model;
mod query;
mod redmine;
mod report;
mod resolver;
mod session;
mod totals;
mod util;

use crate::cli::{Cli, normalize};

/// Log to stderr so stdout stays a single JSON document.
fn init_tracing() {
  let filter = EnvFilter::try_from_env("REDMINE_TOTALS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().compact().with_writer(std::io::stderr))
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing();

  // Phase 1: normalize CLI and resolve the connection
  let cfg = normalize(cli)?;

  // Phase 2: authenticate and run the command
  report::run(&cfg, None)
}
