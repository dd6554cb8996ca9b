//! `gymlog` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the state database.
//! - Map command failures to a non-zero exit status with the message.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use cli::Cli;
use config::Config;
use error::{CliError, CliResult};
use gymlog_core::{open_db, AppStore, SqliteStateRepository};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load()?.with_overrides(cli.db, cli.log_level);
    let log_dir = if config.log_dir.is_absolute() {
        config.log_dir.clone()
    } else {
        std::env::current_dir()?.join(&config.log_dir)
    };
    gymlog_core::init_logging(&config.log_level, &log_dir).map_err(CliError::Logging)?;
    info!(
        "event=cli_start module=cli status=ok version={} db={}",
        gymlog_core::core_version(),
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    let mut store = AppStore::open(SqliteStateRepository::new(&conn))?;
    commands::dispatch(&mut store, cli.command, &config)
}
