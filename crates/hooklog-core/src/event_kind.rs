//! Event kind enum as the single source of truth for event kind strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of loggable occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SessionStart,
    SessionStop,
    UserPrompt,
}

impl EventKind {
    /// String representation used in the `event_type` field of a record.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStart => "session_start",
            Self::SessionStop => "session_stop",
            Self::UserPrompt => "user_prompt",
        }
    }

    /// Maps a host `hook_event_name` to the kind it is logged as.
    ///
    /// Returns `None` for events this logger does not record.
    pub fn from_hook_event_name(name: &str) -> Option<Self> {
        match name {
            "SessionStart" => Some(Self::SessionStart),
            "Stop" => Some(Self::SessionStop),
            "UserPromptSubmit" => Some(Self::UserPrompt),
            _ => None,
        }
    }

    /// The host event name that produces this kind.
    #[must_use]
    pub const fn hook_event_name(&self) -> &'static str {
        match self {
            Self::SessionStart => "SessionStart",
            Self::SessionStop => "Stop",
            Self::UserPrompt => "UserPromptSubmit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session_start" => Ok(Self::SessionStart),
            "session_stop" => Ok(Self::SessionStop),
            "user_prompt" => Ok(Self::UserPrompt),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}
