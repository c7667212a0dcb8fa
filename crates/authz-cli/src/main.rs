//! authz-sync CLI
//!
//! Keeps generated authorization types in sync with a permission schema and
//! checks hand-written relationship models against it.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {e}", "warning".yellow().bold());
    }
    tracing::debug!(command = ?cli.command, "starting");

    let cwd = std::env::current_dir().map_err(|e| authz_fs::Error::io(".", e))?;
    let config = commands::load_config(&cwd, cli.config.as_deref())?;

    match &cli.command {
        Commands::Check(args) => commands::run_check(&cwd, &config, args, cli.verbose),
        Commands::Validate(args) => commands::run_validate(&cwd, &config, args, cli.verbose),
        Commands::Inspect(args) => commands::run_inspect(&cwd, &config, args),
        Commands::Generators => commands::run_generators(),
    }
}
