//! Core logic for hooklog.
//!
//! This crate contains:
//! - Log records: the schema of one logged session event
//! - Partitioning: the monthly `sessions-YYYY-MM.log` files
//! - The event logger: normalizes hook payloads and appends records
//! - The aggregator: reads every partition back into a usage report

pub mod aggregate;
pub mod event_kind;
pub mod logger;
pub mod partition;
pub mod payload;
pub mod record;

pub use aggregate::{
    AggregateError, Aggregator, Coverage, DayCount, HISTOGRAM_DAYS, RECENT_PROMPT_LIMIT,
    RecentPrompt, Report,
};
pub use event_kind::{EventKind, UnknownEventKind};
pub use logger::{EventLogger, LogError};
pub use payload::{DecodeError, HookPayload};
pub use record::{EventDetails, LogRecord};
