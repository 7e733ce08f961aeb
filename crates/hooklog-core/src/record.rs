//! The log record schema and its construction from hook payloads.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::event_kind::EventKind;
use crate::payload::HookPayload;

/// Maximum number of characters kept in a prompt preview.
pub const PREVIEW_CHARS: usize = 100;

/// Appended to a preview when the prompt was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Placeholder for identifiers the host did not supply.
pub const UNKNOWN: &str = "unknown";

/// Startup source recorded for a session start without one.
pub const DEFAULT_STARTUP_SOURCE: &str = "startup";

/// One logged event, stored as a single JSON line in a partition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the logger wrote the record (local time with offset).
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Local>,
    #[serde(default = "unknown", deserialize_with = "nullable::or_unknown")]
    pub session_id: String,
    /// Raw host event name, written as `null` when absent.
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default = "unknown", deserialize_with = "nullable::or_unknown")]
    pub source: String,
    #[serde(default = "unknown", deserialize_with = "nullable::or_unknown")]
    pub cwd: String,
    #[serde(flatten)]
    pub details: EventDetails,
}

/// Kind-specific fields, tagged by `event_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventDetails {
    SessionStart,
    SessionStop {
        #[serde(default, deserialize_with = "nullable::or_default")]
        stop_hook_active: bool,
    },
    UserPrompt {
        /// Character count of the full prompt.
        #[serde(default, deserialize_with = "nullable::or_default")]
        prompt_length: usize,
        #[serde(default, deserialize_with = "nullable::or_default")]
        prompt_preview: String,
    },
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl LogRecord {
    /// Normalizes a loosely-typed payload into a record of the given kind.
    ///
    /// All field defaults live here:
    /// - `session_id`, `cwd`: `"unknown"`
    /// - `source`: `"startup"` for session starts, `"unknown"` otherwise
    /// - `stop_hook_active`: `false`
    /// - `prompt`: empty
    pub fn from_payload(
        payload: &HookPayload,
        kind: EventKind,
        timestamp: DateTime<Local>,
    ) -> Self {
        let field =
            |key: &str, default: &str| payload.str_field(key).unwrap_or(default).to_string();

        let (source, details) = match kind {
            EventKind::SessionStart => (
                field("source", DEFAULT_STARTUP_SOURCE),
                EventDetails::SessionStart,
            ),
            EventKind::SessionStop => (
                field("source", UNKNOWN),
                EventDetails::SessionStop {
                    stop_hook_active: payload.bool_field("stop_hook_active").unwrap_or(false),
                },
            ),
            EventKind::UserPrompt => {
                let prompt = payload.str_field("prompt").unwrap_or_default();
                (
                    field("source", UNKNOWN),
                    EventDetails::UserPrompt {
                        prompt_length: prompt.chars().count(),
                        prompt_preview: prompt_preview(prompt),
                    },
                )
            }
        };

        Self {
            timestamp,
            session_id: field("session_id", UNKNOWN),
            hook_event_name: payload.hook_event_name().map(str::to_string),
            source,
            cwd: field("cwd", UNKNOWN),
            details,
        }
    }

    pub const fn kind(&self) -> EventKind {
        match self.details {
            EventDetails::SessionStart => EventKind::SessionStart,
            EventDetails::SessionStop { .. } => EventKind::SessionStop,
            EventDetails::UserPrompt { .. } => EventKind::UserPrompt,
        }
    }

    /// The first eight characters of the session id, for display.
    pub fn short_session_id(&self) -> &str {
        truncate_chars(&self.session_id, 8)
    }
}

/// Cuts a prompt to [`PREVIEW_CHARS`] characters, marking the cut.
pub fn prompt_preview(prompt: &str) -> String {
    let head = truncate_chars(prompt, PREVIEW_CHARS);
    if head.len() == prompt.len() {
        prompt.to_string()
    } else {
        format!("{head}{TRUNCATION_MARKER}")
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(idx, _)| &s[..idx])
}

/// Lines written by other tools may carry `null` where a value is expected;
/// those read as the field's default.
mod nullable {
    use serde::{Deserialize, Deserializer};

    pub(super) fn or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(super::unknown))
    }

    pub(super) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer};

    /// Accepts RFC 3339 timestamps and offset-less ISO 8601 ones, which
    /// are read as local time.
    pub(super) fn parse(s: &str) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Local));
        }
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        Local.from_local_datetime(&naive).earliest()
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }
}
