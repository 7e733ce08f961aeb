//! hooklog CLI library.
//!
//! This crate provides the hook entry point, the report renderers and
//! configuration loading for the `hooklog` binary.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, PROJECT_DIR_ENV};
