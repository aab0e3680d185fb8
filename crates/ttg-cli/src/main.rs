use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ttg_cli::commands::{projects, report, start, status, stop};
use ttg_cli::{Cli, Commands, Config};
use ttg_core::StopMode;
use ttg_store::Store;

/// Load config and build the store it describes.
fn open_store(config_path: Option<&Path>) -> Result<Store> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(Store::new(config.layout()))
}

fn run(cli: &Cli, command: &Commands) -> Result<()> {
    let store = open_store(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Start { project } => start::run(&mut stdout, &store, project, Utc::now()),
        Commands::Stop { project, delete } => stop::run(
            &mut stdout,
            &store,
            project,
            StopMode::from_discard_flag(*delete),
            Utc::now(),
        ),
        Commands::Status => status::run(&mut stdout, &store, Utc::now()),
        Commands::Projects(args) => projects::run(&mut stdout, &store, args),
        Commands::Report(args) => {
            report::run(&mut stdout, &store, args, Local::now().date_naive())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    // Errors end the command but not the process: they are reported on
    // stdout and the exit status stays zero.
    if let Err(err) = run(&cli, command) {
        tracing::debug!(error = ?err, "command failed");
        println!("{err:#}");
    }

    Ok(())
}
