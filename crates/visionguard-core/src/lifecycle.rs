//! Process lifecycle decisions: what to do at launch, and noticing when the
//! machine comes back from sleep.

use chrono::{DateTime, Duration, Utc};

use crate::storage::StartupMode;

/// How the process should proceed after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Start the timer and show the welcome notification.
    Start,
    /// Ask the user first; the timer stays inactive until they accept.
    Prompt,
    /// Quit without starting anything.
    Exit,
}

impl LaunchPlan {
    /// Manual launches always start. Launches from the OS login entry follow
    /// the configured startup mode.
    pub fn resolve(launched_at_login: bool, mode: StartupMode) -> Self {
        if !launched_at_login {
            return LaunchPlan::Start;
        }
        match mode {
            StartupMode::Auto => LaunchPlan::Start,
            StartupMode::Prompt => LaunchPlan::Prompt,
            StartupMode::Disabled => LaunchPlan::Exit,
        }
    }
}

/// Wall-clock gap between ticks that counts as a wake from sleep.
pub const RESUME_GAP_SECS: i64 = 60;

/// Detects suspend/resume from wall-clock jumps between consecutive ticks.
///
/// The tick interval runs on the monotonic clock, which stops while the
/// machine sleeps; the wall clock keeps going.
#[derive(Debug, Clone)]
pub struct ResumeDetector {
    last_seen: Option<DateTime<Utc>>,
    gap: Duration,
}

impl Default for ResumeDetector {
    fn default() -> Self {
        Self::new(Duration::seconds(RESUME_GAP_SECS))
    }
}

impl ResumeDetector {
    fn new(gap: Duration) -> Self {
        Self {
            last_seen: None,
            gap,
        }
    }

    /// Record a tick at `now`. Returns true if the time since the previous
    /// tick exceeds the resume gap.
    pub fn observe(&mut self, now: DateTime<Utc>) -> bool {
        let resumed = self
            .last_seen
            .is_some_and(|last| now.signed_duration_since(last) > self.gap);
        self.last_seen = Some(now);
        resumed
    }
}
