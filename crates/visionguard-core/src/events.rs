use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notable state changes produced by the timer engine.
///
/// Per-second countdown progress is not an event; observers get that from
/// the status broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Ten seconds of work left.
    BreakWarning {
        at: DateTime<Utc>,
    },
    /// Working phase ran out; the overlay is up.
    BreakStarted {
        break_seconds: u64,
        at: DateTime<Utc>,
    },
    /// Break finished, either by running out or by an explicit skip.
    BreakEnded {
        skipped: bool,
        breaks_today: u64,
        at: DateTime<Utc>,
    },
}
