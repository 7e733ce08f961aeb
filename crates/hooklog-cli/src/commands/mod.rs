//! CLI subcommand implementations.

pub mod hook;
pub mod path;
pub mod report;
