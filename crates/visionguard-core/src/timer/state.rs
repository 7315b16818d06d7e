use serde::{Deserialize, Serialize};

use crate::storage::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Working,
    OnBreak,
}

/// Countdown position within the current phase.
///
/// Invariant: `0 <= seconds_remaining <= phase_total_seconds`, and the total
/// always matches the settings for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    seconds_remaining: u64,
    phase: Phase,
    phase_total_seconds: u64,
}

/// What observers see of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub seconds_remaining: u64,
    pub phase: Phase,
    pub phase_total_seconds: u64,
}

impl TimerState {
    /// Fresh working phase.
    pub fn working(settings: &Settings) -> Self {
        let total = settings.work_seconds();
        Self {
            seconds_remaining: total,
            phase: Phase::Working,
            phase_total_seconds: total,
        }
    }

    /// Fresh break.
    pub fn on_break(settings: &Settings) -> Self {
        let total = settings.break_seconds();
        Self {
            seconds_remaining: total,
            phase: Phase::OnBreak,
            phase_total_seconds: total,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn phase_total_seconds(&self) -> u64 {
        self.phase_total_seconds
    }

    /// Count one second down. Returns the new remaining time.
    pub(crate) fn count_down(&mut self) -> u64 {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining
    }

    /// Re-derive the phase total from `settings`. Remaining time is clamped
    /// down to the new total but never extended.
    pub(crate) fn apply_settings(&mut self, settings: &Settings) {
        self.phase_total_seconds = match self.phase {
            Phase::Working => settings.work_seconds(),
            Phase::OnBreak => settings.break_seconds(),
        };
        self.seconds_remaining = self.seconds_remaining.min(self.phase_total_seconds);
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            seconds_remaining: self.seconds_remaining,
            phase: self.phase,
            phase_total_seconds: self.phase_total_seconds,
        }
    }
}

impl StatusSnapshot {
    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.phase_total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.seconds_remaining as f64 / self.phase_total_seconds as f64)
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn remaining_clock(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.seconds_remaining / 60,
            self.seconds_remaining % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_states_match_settings() {
        let settings = Settings::default();
        let work = TimerState::working(&settings);
        assert_eq!(work.seconds_remaining(), 1200);
        assert_eq!(work.phase_total_seconds(), 1200);

        let rest = TimerState::on_break(&settings);
        assert_eq!(rest.phase(), Phase::OnBreak);
        assert_eq!(rest.seconds_remaining(), 20);
    }

    #[test]
    fn apply_settings_clamps_but_never_extends() {
        let mut settings = Settings::default();
        let mut state = TimerState::working(&settings);
        for _ in 0..1150 {
            state.count_down();
        }
        assert_eq!(state.seconds_remaining(), 50);

        settings.work_duration_minutes = 30;
        state.apply_settings(&settings);
        assert_eq!(state.seconds_remaining(), 50);
        assert_eq!(state.phase_total_seconds(), 1800);

        settings.break_duration_seconds = 5;
        let mut rest = TimerState::on_break(&Settings::default());
        rest.apply_settings(&settings);
        assert_eq!(rest.seconds_remaining(), 5);
        assert_eq!(rest.phase_total_seconds(), 5);
    }

    #[test]
    fn snapshot_progress_and_clock() {
        let snap = StatusSnapshot {
            seconds_remaining: 300,
            phase: Phase::Working,
            phase_total_seconds: 1200,
        };
        assert!((snap.progress() - 0.75).abs() < f64::EPSILON);
        assert_eq!(snap.remaining_clock(), "05:00");
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&Phase::OnBreak).unwrap();
        assert_eq!(json, "\"on_break\"");
    }
}
