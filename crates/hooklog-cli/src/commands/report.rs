//! Report command for summarizing the session logs.
//!
//! The aggregation itself lives in `hooklog_core`; this module only renders
//! a [`Report`] as human-readable text or JSON.

use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};
use hooklog_core::{Aggregator, Coverage, Report};
use num_format::{Locale, ToFormattedString};

use crate::Config;

/// Widest activity bar, in blocks.
const MAX_BAR_WIDTH: usize = 20;

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, config: &Config, json: bool) -> Result<()> {
    let aggregator = Aggregator::new(&config.project_root);
    let log_dir = aggregator.log_dir().display();
    let report = aggregator
        .aggregate()
        .with_context(|| format!("failed to read logs in {log_dir}"))?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)
            .context("failed to serialize report")?;
        writeln!(writer)?;
    } else {
        write!(writer, "{}", TextReport(&report))?;
    }
    Ok(())
}

/// Human-readable rendering of a [`Report`].
pub struct TextReport<'a>(pub &'a Report);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        match report.coverage {
            Coverage::NoLogDirectory => {
                return writeln!(
                    f,
                    "No session logs yet. Start a session to begin recording."
                );
            }
            Coverage::NoPartitions => return writeln!(f, "Session logs are empty."),
            Coverage::Scanned { .. } => {}
        }

        writeln!(f, "SESSION STATISTICS")?;
        writeln!(f, "==================")?;
        writeln!(f, "Total sessions: {}", report.total_sessions)?;
        writeln!(f, "Total prompts:  {}", report.total_prompts)?;

        if let Some(last) = report.last_activity {
            writeln!(f, "Last activity:  {}", last.format("%Y-%m-%d %H:%M"))?;
            writeln!(f, "Active days:    {}", report.active_days)?;

            writeln!(f)?;
            writeln!(f, "ACTIVITY (last {} days)", report.daily_histogram.len())?;
            for day in &report.daily_histogram {
                writeln!(
                    f,
                    "  {}  {:<MAX_BAR_WIDTH$}  {}",
                    day.date.format("%Y-%m-%d"),
                    activity_bar(day.count),
                    plural(day.count, "session", "sessions"),
                )?;
            }
        }

        if report.total_prompts > 0 {
            writeln!(f)?;
            writeln!(f, "PROMPTS")?;
            writeln!(
                f,
                "  Average length: {} characters",
                format_average(report.avg_prompt_length)
            )?;
            writeln!(
                f,
                "  Total volume:   {} characters",
                report.total_prompt_chars.to_formatted_string(&Locale::en)
            )?;

            writeln!(f)?;
            writeln!(f, "RECENT PROMPTS")?;
            for prompt in &report.recent_prompts {
                writeln!(f, "  {}  {}", prompt.time.format("%H:%M"), prompt.preview)?;
            }
        }

        if let Coverage::Scanned { skipped_lines, .. } = report.coverage {
            if skipped_lines > 0 {
                writeln!(f)?;
                writeln!(
                    f,
                    "Note: skipped {}",
                    plural(skipped_lines, "malformed log line", "malformed log lines")
                )?;
            }
        }

        Ok(())
    }
}

/// A bar of one block per session, capped at [`MAX_BAR_WIDTH`].
pub fn activity_bar(count: usize) -> String {
    "█".repeat(count.min(MAX_BAR_WIDTH))
}

/// Rounds an average to whole characters.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_average(avg: f64) -> String {
    (avg.round().max(0.0) as u64).to_formatted_string(&Locale::en)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
    use hooklog_core::{DayCount, RecentPrompt};
    use insta::assert_snapshot;

    fn histogram(counts: [usize; 7]) -> Vec<DayCount> {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        counts
            .iter()
            .zip(0u64..)
            .map(|(count, offset)| DayCount {
                date: today - chrono::Days::new(offset),
                count: *count,
            })
            .collect()
    }

    fn empty_report(coverage: Coverage) -> Report {
        Report {
            coverage,
            total_sessions: 0,
            total_prompts: 0,
            last_activity: None,
            active_days: 0,
            daily_histogram: histogram([0; 7]),
            avg_prompt_length: 0.0,
            total_prompt_chars: 0,
            recent_prompts: Vec::new(),
        }
    }

    fn full_report() -> Report {
        Report {
            coverage: Coverage::Scanned {
                files: 2,
                records: 40,
                skipped_lines: 1,
            },
            total_sessions: 27,
            total_prompts: 12,
            last_activity: Local.with_ymd_and_hms(2026, 10, 19, 10, 30, 0).earliest(),
            active_days: 9,
            daily_histogram: histogram([2, 0, 1, 25, 0, 0, 3]),
            avg_prompt_length: 1234.5,
            total_prompt_chars: 14_814,
            recent_prompts: vec![
                RecentPrompt {
                    time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
                    preview: "explain the failing test".to_string(),
                },
                RecentPrompt {
                    time: NaiveTime::from_hms_opt(10, 31, 12).unwrap(),
                    preview: "add a migration".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_activity_bar_is_capped() {
        assert_eq!(activity_bar(0), "");
        assert_eq!(activity_bar(3), "███");
        assert_eq!(activity_bar(50).chars().count(), 20);
    }

    #[test]
    fn test_format_average_rounds() {
        assert_eq!(format_average(0.0), "0");
        assert_eq!(format_average(149.4), "149");
        assert_eq!(format_average(1234.5), "1,235");
    }

    #[test]
    fn test_missing_logs_message() {
        let output = TextReport(&empty_report(Coverage::NoLogDirectory)).to_string();
        assert_snapshot!(output, @"No session logs yet. Start a session to begin recording.");
    }

    #[test]
    fn test_empty_logs_message() {
        let output = TextReport(&empty_report(Coverage::NoPartitions)).to_string();
        assert_snapshot!(output, @"Session logs are empty.");
    }

    #[test]
    fn test_scanned_without_sessions_or_prompts() {
        let output = TextReport(&empty_report(Coverage::Scanned {
            files: 1,
            records: 3,
            skipped_lines: 0,
        }))
        .to_string();

        assert_snapshot!(output, @r"
        SESSION STATISTICS
        ==================
        Total sessions: 0
        Total prompts:  0
        ");
    }

    #[test]
    fn test_full_report_layout() {
        let output = TextReport(&full_report()).to_string();

        assert_snapshot!(output, @r"
        SESSION STATISTICS
        ==================
        Total sessions: 27
        Total prompts:  12
        Last activity:  2026-10-19 10:30
        Active days:    9

        ACTIVITY (last 7 days)
          2026-10-19  ██                    2 sessions
          2026-10-18                        0 sessions
          2026-10-17  █                     1 session
          2026-10-16  ████████████████████  25 sessions
          2026-10-15                        0 sessions
          2026-10-14                        0 sessions
          2026-10-13  ███                   3 sessions

        PROMPTS
          Average length: 1,235 characters
          Total volume:   14,814 characters

        RECENT PROMPTS
          09:05  explain the failing test
          10:31  add a migration

        Note: skipped 1 malformed log line
        ");
    }

    #[test]
    fn test_json_report_is_structured() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            project_root: temp.path().to_path_buf(),
            project_description: None,
        };

        let mut output = Vec::new();
        run(&mut output, &config, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["coverage"]["status"], "no_log_directory");
        assert_eq!(value["total_sessions"], 0);
        assert_eq!(value["daily_histogram"].as_array().unwrap().len(), 7);
    }
}
