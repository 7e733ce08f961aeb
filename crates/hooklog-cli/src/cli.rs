//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Session event logger for coding-assistant hooks.
///
/// Records session starts, stops and prompt submissions into monthly log
/// files under `.claude/logs`, and summarizes them on demand.
#[derive(Debug, Parser)]
#[command(name = "hooklog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project root (overrides `CLAUDE_PROJECT_DIR` and the config file).
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log one hook event read as JSON from stdin.
    Hook,

    /// Summarize the session logs.
    Report {
        /// Output the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the log file the next event will be written to.
    Path,
}
