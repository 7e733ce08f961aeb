//! The read path: rebuilds usage statistics from every partition file.
//!
//! Aggregation is a batch pass over whatever partition files exist when it
//! runs. It never writes. Lines that do not parse as a [`LogRecord`] are
//! skipped and counted, so one corrupt or half-written line never hides
//! the rest of the log.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::partition::{self, DiscoverError};
use crate::record::{EventDetails, LogRecord};

/// Number of calendar days in the activity histogram, today included.
pub const HISTOGRAM_DAYS: u64 = 7;

/// Number of prompts listed in [`Report::recent_prompts`].
pub const RECENT_PROMPT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("failed to open partition file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read partition file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the aggregator found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Coverage {
    /// The log directory does not exist yet.
    NoLogDirectory,
    /// The log directory holds no partition files.
    NoPartitions,
    Scanned {
        files: usize,
        records: usize,
        /// Non-blank lines that did not parse as a record.
        skipped_lines: usize,
    },
}

/// Session starts on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// A prompt reduced to its local time of day and preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentPrompt {
    pub time: NaiveTime,
    pub preview: String,
}

/// Statistics computed by one aggregation pass. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub coverage: Coverage,
    pub total_sessions: usize,
    pub total_prompts: usize,
    /// Latest session start, if any.
    pub last_activity: Option<DateTime<Local>>,
    /// Distinct local dates with at least one session start.
    pub active_days: usize,
    /// Session starts per day, today first, always [`HISTOGRAM_DAYS`] long.
    pub daily_histogram: Vec<DayCount>,
    pub avg_prompt_length: f64,
    pub total_prompt_chars: u64,
    /// Latest prompts by record timestamp, oldest first.
    pub recent_prompts: Vec<RecentPrompt>,
}

impl Report {
    /// Computes a report from parsed records.
    ///
    /// Only session starts and user prompts contribute; other kinds are
    /// ignored.
    pub fn from_records(records: &[LogRecord], today: NaiveDate, coverage: Coverage) -> Self {
        let sessions: Vec<&LogRecord> = records
            .iter()
            .filter(|r| matches!(r.details, EventDetails::SessionStart))
            .collect();
        let mut prompts: Vec<(&LogRecord, usize, &str)> = records
            .iter()
            .filter_map(|r| match &r.details {
                EventDetails::UserPrompt {
                    prompt_length,
                    prompt_preview,
                } => Some((r, *prompt_length, prompt_preview.as_str())),
                _ => None,
            })
            .collect();

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for session in &sessions {
            *per_day.entry(session.timestamp.date_naive()).or_default() += 1;
        }

        let daily_histogram = (0..HISTOGRAM_DAYS)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| DayCount {
                date,
                count: per_day.get(&date).copied().unwrap_or(0),
            })
            .collect();

        let total_prompt_chars: u64 = prompts.iter().map(|(_, len, _)| *len as u64).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg_prompt_length = if prompts.is_empty() {
            0.0
        } else {
            total_prompt_chars as f64 / prompts.len() as f64
        };

        // Stable sort keeps file order for equal timestamps.
        prompts.sort_by_key(|(r, _, _)| r.timestamp);
        let skip = prompts.len().saturating_sub(RECENT_PROMPT_LIMIT);
        let recent_prompts = prompts[skip..]
            .iter()
            .map(|(r, _, preview)| RecentPrompt {
                time: r.timestamp.time(),
                preview: (*preview).to_string(),
            })
            .collect();

        Self {
            coverage,
            total_sessions: sessions.len(),
            total_prompts: prompts.len(),
            last_activity: sessions.iter().map(|s| s.timestamp).max(),
            active_days: per_day.len(),
            daily_histogram,
            avg_prompt_length,
            total_prompt_chars,
            recent_prompts,
        }
    }

    /// True when no partition file was found at all.
    pub const fn is_empty_log(&self) -> bool {
        matches!(
            self.coverage,
            Coverage::NoLogDirectory | Coverage::NoPartitions
        )
    }
}

/// Parses one partition line. Blank and malformed lines yield `None`.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

/// Reads the partition files of one project.
#[derive(Debug, Clone)]
pub struct Aggregator {
    log_dir: PathBuf,
}

impl Aggregator {
    pub fn new(project_root: &Path) -> Self {
        Self {
            log_dir: partition::log_dir(project_root),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Aggregates all partitions, bucketing days relative to today.
    pub fn aggregate(&self) -> Result<Report, AggregateError> {
        self.aggregate_at(Local::now().date_naive())
    }

    /// Aggregates all partitions with an explicit "today".
    pub fn aggregate_at(&self, today: NaiveDate) -> Result<Report, AggregateError> {
        let (records, coverage) = self.load()?;
        Ok(Report::from_records(&records, today, coverage))
    }

    /// Loads every parseable record from every partition.
    pub fn load(&self) -> Result<(Vec<LogRecord>, Coverage), AggregateError> {
        if !self.log_dir.is_dir() {
            tracing::debug!(log_dir = %self.log_dir.display(), "log directory does not exist");
            return Ok((Vec::new(), Coverage::NoLogDirectory));
        }

        let paths = partition::discover(&self.log_dir)?;
        if paths.is_empty() {
            return Ok((Vec::new(), Coverage::NoPartitions));
        }

        let mut records = Vec::new();
        let mut skipped_lines = 0;
        for path in &paths {
            skipped_lines += read_partition(path, &mut records)?;
        }

        if skipped_lines > 0 {
            tracing::warn!(skipped_lines, "skipped malformed partition lines");
        }

        let coverage = Coverage::Scanned {
            files: paths.len(),
            records: records.len(),
            skipped_lines,
        };
        Ok((records, coverage))
    }
}

/// Appends the records of one partition, returning how many lines were
/// skipped.
fn read_partition(path: &Path, records: &mut Vec<LogRecord>) -> Result<usize, AggregateError> {
    let file = File::open(path).map_err(|source| AggregateError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut skipped = 0;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            // Not UTF-8; the bytes are consumed, so the next line still reads.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::debug!(
                    path = %path.display(),
                    line = line_num + 1,
                    "skipping unreadable line"
                );
                skipped += 1;
                continue;
            }
            Err(source) => {
                return Err(AggregateError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Some(record) => records.push(record),
            None => {
                tracing::debug!(
                    path = %path.display(),
                    line = line_num + 1,
                    "skipping malformed line"
                );
                skipped += 1;
            }
        }
    }

    Ok(skipped)
}
