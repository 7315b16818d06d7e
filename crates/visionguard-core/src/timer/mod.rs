mod engine;
mod state;

pub use engine::{Collaborators, TimerEngine, IDLE_THRESHOLD_SECS, WARNING_AT_SECS};
pub use state::{Phase, StatusSnapshot, TimerState};
