#![warn(clippy::uninlined_format_args)]

mod args;
mod bootstrap;
mod commands;

use args::{Cli, Command};
use billsplit_application::BillService;
use billsplit_infrastructure::RandomIdGenerator;
use bootstrap::{AppConfig, init_logging};
use clap::Parser;
use std::{borrow::Cow, process};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    let cli = Cli::parse();
    init_logging();
    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(command: Command) -> CliResult<()> {
    let config = AppConfig::from_env();
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        cache_dir = ?config.cache_dir,
        currency = %config.currency,
        "Loaded configuration"
    );

    let repository = config.build_repository();
    let ids = RandomIdGenerator;
    let service = BillService::new(repository.as_ref(), &ids);

    let output = commands::execute(command, &service, &config.currency)?;
    println!("{output}");
    Ok(())
}
