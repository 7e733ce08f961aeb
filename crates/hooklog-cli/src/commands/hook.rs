//! Hook command for receiving events from the assistant host.
//!
//! The host runs `hooklog hook` once per event with a JSON payload on stdin.
//! Recognized events are appended to the current month's partition file and
//! acknowledged on stdout; anything else is ignored.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use hooklog_core::{EventDetails, EventKind, EventLogger, HookPayload, LogRecord};

use crate::Config;

/// Context attached to payloads that are not a JSON object.
pub const DECODE_FAILURE: &str = "failed to decode hook input";

/// Structured response returned to the host on session start.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: &'static str,
    pub additional_context: String,
}

impl HookResponse {
    fn session_start(additional_context: String) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: EventKind::SessionStart.hook_event_name(),
                additional_context,
            },
        }
    }
}

/// Runs the hook command.
///
/// Returns the written record, or `None` when the event was not one that
/// gets logged.
pub fn run<R: Read, W: Write>(
    input: R,
    writer: &mut W,
    config: &Config,
) -> Result<Option<LogRecord>> {
    let payload = HookPayload::from_reader(input).context(DECODE_FAILURE)?;

    let Some(kind) = payload
        .hook_event_name()
        .and_then(EventKind::from_hook_event_name)
    else {
        tracing::debug!(
            hook_event_name = ?payload.hook_event_name(),
            "ignoring unrecognized hook event"
        );
        return Ok(None);
    };

    let logger = EventLogger::new(&config.project_root);
    let record = logger
        .record(&payload, kind)
        .context("failed to log hook event")?;

    acknowledge(writer, &record, config)?;
    Ok(Some(record))
}

/// Writes the confirmation line, plus the context response on session start.
fn acknowledge<W: Write>(writer: &mut W, record: &LogRecord, config: &Config) -> Result<()> {
    match &record.details {
        EventDetails::SessionStart => {
            writeln!(writer, "Session started: {}...", record.short_session_id())?;
            let context = session_context(record, config.project_description.as_deref());
            let response = serde_json::to_string(&HookResponse::session_start(context))
                .context("failed to serialize hook response")?;
            writeln!(writer, "{response}")?;
        }
        EventDetails::SessionStop { .. } => {
            writeln!(writer, "Session stopped: {}...", record.short_session_id())?;
        }
        EventDetails::UserPrompt { prompt_length, .. } => {
            writeln!(writer, "Prompt submitted ({prompt_length} characters)")?;
        }
    }
    Ok(())
}

/// Builds the project context blurb handed back to the host.
pub fn session_context(record: &LogRecord, description: Option<&str>) -> String {
    let mut context = format!(
        "## Project context as of {}\n\nSession: {}\nStartup source: {}\nWorking directory: {}",
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.short_session_id(),
        record.source,
        record.cwd,
    );
    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        context.push_str("\n\n");
        context.push_str(description);
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::fs;
    use std::path::Path;

    fn config_for(root: &Path) -> Config {
        Config {
            project_root: root.to_path_buf(),
            project_description: None,
        }
    }

    fn run_hook(input: &str, config: &Config) -> (Result<Option<LogRecord>>, String) {
        let mut output = Vec::new();
        let result = run(input.as_bytes(), &mut output, config);
        (result, String::from_utf8(output).unwrap())
    }

    fn logged_lines(root: &Path) -> Vec<String> {
        let logs = root.join(".claude/logs");
        if !logs.exists() {
            return Vec::new();
        }
        let mut lines = Vec::new();
        for entry in fs::read_dir(logs).unwrap() {
            let content = fs::read_to_string(entry.unwrap().path()).unwrap();
            lines.extend(content.lines().map(str::to_string));
        }
        lines
    }

    #[test]
    fn session_start_logs_and_returns_context() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());

        let (result, output) = run_hook(
            r#"{"hook_event_name":"SessionStart","session_id":"9b2e4c1d-aaaa-bbbb","source":"resume","cwd":"/work/app"}"#,
            &config,
        );

        let record = result.unwrap().unwrap();
        assert_eq!(record.kind(), EventKind::SessionStart);
        assert_eq!(logged_lines(temp.path()).len(), 1);

        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("Session started: 9b2e4c1d..."));

        let response: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        let specific = &response["hookSpecificOutput"];
        assert_eq!(specific["hookEventName"], "SessionStart");
        let context = specific["additionalContext"].as_str().unwrap();
        assert!(context.contains("Session: 9b2e4c1d"));
        assert!(context.contains("Startup source: resume"));
        assert!(context.contains("Working directory: /work/app"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn stop_prints_confirmation() {
        let temp = tempfile::tempdir().unwrap();
        let (result, output) = run_hook(
            r#"{"hook_event_name":"Stop","session_id":"0011223344556677","stop_hook_active":false}"#,
            &config_for(temp.path()),
        );

        assert_eq!(result.unwrap().unwrap().kind(), EventKind::SessionStop);
        assert_eq!(output, "Session stopped: 00112233...\n");
    }

    #[test]
    fn prompt_prints_character_count() {
        let temp = tempfile::tempdir().unwrap();
        let (result, output) = run_hook(
            r#"{"hook_event_name":"UserPromptSubmit","prompt":"добавь тесты"}"#,
            &config_for(temp.path()),
        );

        assert!(result.unwrap().is_some());
        assert_eq!(output, "Prompt submitted (12 characters)\n");
    }

    #[test]
    fn unrecognized_event_is_a_silent_no_op() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());

        for input in [r#"{"hook_event_name":"PreToolUse"}"#, "{}"] {
            let (result, output) = run_hook(input, &config);
            assert!(result.unwrap().is_none());
            assert!(output.is_empty());
        }
        assert!(logged_lines(temp.path()).is_empty());
        assert!(!temp.path().join(".claude").exists());
    }

    #[test]
    fn malformed_input_is_a_decode_failure() {
        let temp = tempfile::tempdir().unwrap();
        let (result, output) = run_hook("{\"hook_event_name\":", &config_for(temp.path()));

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), DECODE_FAILURE);
        assert!(err.downcast_ref::<hooklog_core::DecodeError>().is_some());
        assert!(output.is_empty());
        assert!(logged_lines(temp.path()).is_empty());
    }

    #[test]
    fn session_context_layout() {
        let mut record = LogRecord::from_payload(
            &HookPayload::from_json(
                r#"{"session_id":"c0ffee00-1234","source":"startup","cwd":"/home/dev/shop"}"#,
            )
            .unwrap(),
            EventKind::SessionStart,
            Local
                .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
                .earliest()
                .unwrap(),
        );

        insta::assert_snapshot!(session_context(&record, Some("  Online shop backend.\n")), @r"
        ## Project context as of 2026-03-14 09:26

        Session: c0ffee00
        Startup source: startup
        Working directory: /home/dev/shop

        Online shop backend.
        ");

        record.cwd = "/tmp".to_string();
        let context = session_context(&record, Some("   "));
        assert!(context.ends_with("Working directory: /tmp"));
    }
}
