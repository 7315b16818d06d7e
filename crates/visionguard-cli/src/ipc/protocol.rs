//! Wire format of the control socket: one JSON object per line.

use serde::{Deserialize, Serialize};
use visionguard_core::{Settings, StatsLedger, StatusSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    GetStatus,
    SkipBreak,
    GetSettings,
    SetSettings { settings: Settings },
    GetStats,
    /// Turns the connection into a one-way stream of `status` responses.
    Subscribe,
    Activate,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Status { status: StatusSnapshot },
    Settings { settings: Settings },
    Stats { stats: StatsLedger },
    Ack,
    Error { message: String },
}
