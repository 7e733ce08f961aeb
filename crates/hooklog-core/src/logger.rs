//! The write path: turns hook payloads into appended log lines.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use fs2::FileExt;
use thiserror::Error;

use crate::event_kind::EventKind;
use crate::partition;
use crate::payload::HookPayload;
use crate::record::LogRecord;

/// Errors from appending a record. Nothing is written when these occur,
/// except for [`LogError::Sync`], where the line may already be in the
/// page cache.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize log record")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to open partition file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to lock partition file {path}")]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append to partition file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush partition file {path}")]
    Sync {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Appends records to the monthly partition files of one project.
#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(project_root: &Path) -> Self {
        Self {
            log_dir: partition::log_dir(project_root),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Records one event, timestamped now.
    pub fn record(&self, payload: &HookPayload, kind: EventKind) -> Result<LogRecord, LogError> {
        self.record_at(payload, kind, Local::now())
    }

    /// Records one event with an explicit write time.
    ///
    /// The partition is chosen from `now`, never from payload contents.
    pub fn record_at(
        &self,
        payload: &HookPayload,
        kind: EventKind,
        now: DateTime<Local>,
    ) -> Result<LogRecord, LogError> {
        let record = LogRecord::from_payload(payload, kind, now);
        let path = partition::partition_path(&self.log_dir, &record.timestamp);
        self.append(&path, &record)?;

        tracing::info!(
            event_type = %kind,
            session_id = %record.session_id,
            path = %path.display(),
            "logged event"
        );
        Ok(record)
    }

    /// Appends one complete line under an exclusive lock on the partition.
    fn append(&self, path: &Path, record: &LogRecord) -> Result<(), LogError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        fs::create_dir_all(&self.log_dir).map_err(|source| LogError::CreateDir {
            path: self.log_dir.clone(),
            source,
        })?;

        // Read access lets the lock work on platforms that need it.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        file.lock_exclusive().map_err(|source| LogError::Lock {
            path: path.to_path_buf(),
            source,
        })?;

        file.write_all(line.as_bytes())
            .map_err(|source| LogError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        file.sync_data().map_err(|source| LogError::Sync {
            path: path.to_path_buf(),
            source,
        })?;

        // Closing the file releases the lock.
        Ok(())
    }
}
