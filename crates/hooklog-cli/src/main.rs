use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hooklog_cli::commands::{hook, path, report};
use hooklog_cli::{Cli, Commands, Config};

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_project_root(cli.project_dir);
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Hook) => {
            hook::run(io::stdin().lock(), &mut out, &config)?;
        }
        Some(Commands::Report { json }) => report::run(&mut out, &config, json)?,
        Some(Commands::Path) => path::run(&mut out, &config)?,
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support. Stdout belongs to the
    // host, so diagnostics go to stderr.
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

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
