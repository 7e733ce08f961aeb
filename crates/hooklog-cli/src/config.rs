//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Environment variable the host sets to the project root.
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the project whose `.claude/logs` directory holds the logs.
    pub project_root: PathBuf,
    /// Free text appended to the context returned on session start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("project_root", &self.project_root)
            .field("project_description", &self.project_description.is_some())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            project_description: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// `CLAUDE_PROJECT_DIR`, then `HOOKLOG_*` variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        file_figment(config_path)
            .merge(
                Env::raw()
                    .only(&[PROJECT_DIR_ENV])
                    .map(|_| "project_root".into()),
            )
            .merge(Env::prefixed("HOOKLOG_"))
            .extract()
    }

    /// Applies a `--project-dir` override.
    #[must_use]
    pub fn with_project_root(mut self, project_root: Option<PathBuf>) -> Self {
        if let Some(root) = project_root {
            self.project_root = root;
        }
        self
    }
}

/// Defaults plus config files, without environment overrides.
fn file_figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    // Load from default config location
    if let Some(config_dir) = dirs_config_path() {
        figment = figment.merge(Toml::file(config_dir.join("config.toml")));
    }

    // Load from specified config file
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment
}

/// Returns the platform-specific config directory for hooklog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hooklog"))
}
