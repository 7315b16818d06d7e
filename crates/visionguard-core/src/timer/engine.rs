//! Timer engine implementation.
//!
//! The engine is a two-phase countdown. It does not use internal threads or
//! timers - the owner is responsible for calling `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Working --(remaining hits 0)--> OnBreak --(remaining hits 0 | skip)--> Working
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(collaborators)?;
//! // Once per second:
//! engine.tick(); // Returns Some(Event) on warnings and phase changes
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::broadcast;

use super::state::{Phase, StatusSnapshot, TimerState};
use crate::broadcast::StatusBroadcast;
use crate::error::Result;
use crate::events::Event;
use crate::platform::{AutoLaunch, Clock, IdleSource, Notifier, Overlay};
use crate::stats::{DailyStat, StatsLedger};
use crate::storage::{commit_settings, Settings, SettingsRepository, StatsRepository};

/// Ticks with more idle time than this are not counted.
pub const IDLE_THRESHOLD_SECS: u64 = 30;

/// Remaining work seconds at which the break warning fires.
pub const WARNING_AT_SECS: u64 = 10;

/// Everything the engine talks to besides its own state.
pub struct Collaborators {
    pub settings: Box<dyn SettingsRepository>,
    pub stats: Box<dyn StatsRepository>,
    pub idle: Box<dyn IdleSource>,
    pub notifier: Box<dyn Notifier>,
    pub overlay: Box<dyn Overlay>,
    pub autostart: Box<dyn AutoLaunch>,
    pub clock: Box<dyn Clock>,
}

/// Core timer engine.
///
/// Sole owner of the timer state. Settings are cached here and only change
/// through [`TimerEngine::set_settings`], which also persists them.
pub struct TimerEngine {
    state: TimerState,
    settings: Settings,
    ledger: StatsLedger,
    broadcast: StatusBroadcast,
    deps: Collaborators,
}

impl TimerEngine {
    /// Load settings and stored stats and start a fresh working phase.
    ///
    /// # Errors
    /// Returns an error if either repository cannot be read.
    pub fn new(deps: Collaborators) -> Result<Self> {
        let settings = deps.settings.load()?;
        let ledger = deps.stats.load_all()?;
        let state = TimerState::working(&settings);
        tracing::debug!(
            work_secs = settings.work_seconds(),
            break_secs = settings.break_seconds(),
            days = ledger.len(),
            "timer engine created"
        );
        Ok(Self {
            state,
            settings,
            ledger,
            broadcast: StatusBroadcast::new(state.snapshot()),
            deps,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Last published snapshot. Every state change publishes, so this is
    /// always the current position.
    pub fn status(&self) -> StatusSnapshot {
        self.broadcast.latest()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusSnapshot> {
        self.broadcast.subscribe()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> &StatsLedger {
        &self.ledger
    }

    pub fn today(&self) -> DailyStat {
        self.ledger.day(self.deps.clock.today())
    }

    /// Wall-clock time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.deps.clock.now()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the countdown by one second.
    ///
    /// Does nothing at all while the user has been idle for longer than
    /// [`IDLE_THRESHOLD_SECS`].
    pub fn tick(&mut self) -> Option<Event> {
        let idle = self.deps.idle.idle_seconds();
        if idle > IDLE_THRESHOLD_SECS {
            tracing::trace!(idle, "user idle, tick skipped");
            return None;
        }

        if self.state.phase() == Phase::Working {
            let today = self.deps.clock.today();
            let stat = self.ledger.add_screen_time(today, 1);
            self.persist(today, &stat);
        }

        let remaining = self.state.count_down();
        let mut event = None;

        // Exact match only: a tick that jumps past 10 loses the warning.
        if self.state.phase() == Phase::Working
            && remaining == WARNING_AT_SECS
            && self.settings.enable_notifications
        {
            self.deps.notifier.break_incoming();
            event = Some(Event::BreakWarning { at: self.now() });
        }

        if remaining == 0 {
            event = Some(match self.state.phase() {
                Phase::Working => self.start_break(),
                Phase::OnBreak => self.end_break(false),
            });
        }

        self.broadcast.publish(self.state.snapshot());
        event
    }

    /// End the current break now. No-op while working.
    pub fn skip_break(&mut self) -> Option<Event> {
        if self.state.phase() != Phase::OnBreak {
            return None;
        }
        let event = self.end_break(true);
        self.broadcast.publish(self.state.snapshot());
        Some(event)
    }

    /// Validate, persist and apply new settings.
    ///
    /// The current phase keeps running; its remaining time is clamped to the
    /// new phase length but never extended.
    ///
    /// # Errors
    /// Returns an error if the settings are invalid or cannot be saved, in
    /// which case nothing changes.
    pub fn set_settings(&mut self, next: Settings) -> Result<bool> {
        commit_settings(
            self.deps.settings.as_ref(),
            self.deps.autostart.as_ref(),
            &self.settings,
            &next,
        )?;
        self.settings = next;
        self.state.apply_settings(&self.settings);

        let snapshot = self.state.snapshot();
        tracing::info!(
            phase = ?snapshot.phase,
            remaining = snapshot.seconds_remaining,
            total = snapshot.phase_total_seconds,
            "settings applied"
        );
        self.broadcast.publish(snapshot);
        Ok(true)
    }

    /// Show the "running in the background" notification if enabled.
    pub fn welcome(&self) {
        if self.settings.enable_notifications {
            self.deps.notifier.welcome();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_break(&mut self) -> Event {
        self.state = TimerState::on_break(&self.settings);
        let break_seconds = self.state.phase_total_seconds();
        tracing::info!(break_seconds, "break started");
        self.deps.overlay.show(break_seconds, self.settings.is_strict);
        Event::BreakStarted {
            break_seconds,
            at: self.now(),
        }
    }

    fn end_break(&mut self, skipped: bool) -> Event {
        let today = self.deps.clock.today();
        let stat = self.ledger.record_break(today);
        self.persist(today, &stat);

        if self.settings.enable_notifications {
            self.deps.notifier.break_complete();
        }

        self.state = TimerState::working(&self.settings);
        tracing::info!(skipped, breaks_today = stat.breaks_taken, "break ended");
        self.deps.overlay.hide();
        Event::BreakEnded {
            skipped,
            breaks_today: stat.breaks_taken,
            at: self.now(),
        }
    }

    /// Write-through of a day's totals. The ledger stays authoritative if
    /// the write fails.
    fn persist(&self, date: NaiveDate, stat: &DailyStat) {
        if let Err(e) = self.deps.stats.put(date, stat) {
            tracing::warn!(%date, error = %e, "failed to persist daily stats");
        }
    }
}
