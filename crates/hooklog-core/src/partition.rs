//! Monthly partition files.
//!
//! Records live under `<project_root>/.claude/logs/` in one file per calendar
//! month, named `sessions-YYYY-MM.log`. The month comes from the time the
//! record was written.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use glob::{GlobError, Pattern, PatternError};
use thiserror::Error;

/// Prefix shared by every partition file name.
pub const PARTITION_PREFIX: &str = "sessions-";

/// Extension shared by every partition file name.
pub const PARTITION_EXTENSION: &str = "log";

/// Glob matching partition file names.
const PARTITION_GLOB: &str = "sessions-[0-9][0-9][0-9][0-9]-[0-9][0-9].log";

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("invalid partition pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("failed to read partition entry: {0}")]
    Entry(#[from] GlobError),
}

/// Returns the log directory for a project root.
pub fn log_dir(project_root: &Path) -> PathBuf {
    project_root.join(".claude").join("logs")
}

/// Returns the partition identifier for a timestamp, e.g. `sessions-2026-10`.
pub fn partition_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{PARTITION_PREFIX}{}", timestamp.format("%Y-%m"))
}

/// Returns the partition file a record written at `timestamp` belongs in.
pub fn partition_path<Tz: TimeZone>(log_dir: &Path, timestamp: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: Display,
{
    log_dir.join(format!(
        "{}.{PARTITION_EXTENSION}",
        partition_name(timestamp)
    ))
}

/// Lists every partition file in `log_dir`, sorted by name (oldest month
/// first).
///
/// A missing directory yields an empty list.
pub fn discover(log_dir: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let pattern = format!(
        "{}/{PARTITION_GLOB}",
        Pattern::escape(&log_dir.to_string_lossy())
    );

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    tracing::debug!(
        log_dir = %log_dir.display(),
        count = paths.len(),
        "discovered partition files"
    );
    Ok(paths)
}
