//! Seams to the desktop environment.
//!
//! The engine never talks to the OS directly. Each side effect it triggers
//! goes through one of these traits so the binary can plug in real adapters
//! and tests can plug in recorders.

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::error::Result;

/// Answer of the user to the startup prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptResponse {
    Accepted,
    Declined,
}

/// User-facing notifications.
///
/// Delivery is best-effort: implementations log their own failures.
pub trait Notifier: Send {
    /// A break starts in ten seconds.
    fn break_incoming(&self);

    /// A break just ended.
    fn break_complete(&self);

    /// The timer is running in the background.
    fn welcome(&self);

    /// Ask whether to start a session after an automatic launch. May block
    /// until the user answers.
    fn prompt_start(&self) -> PromptResponse;
}

/// The full-screen "look away" surface.
pub trait Overlay: Send {
    /// In strict mode the surface offers no way to skip the break.
    fn show(&mut self, break_seconds: u64, strict: bool);
    fn hide(&mut self);
}

/// Seconds since the last keyboard or pointer input.
pub trait IdleSource: Send {
    fn idle_seconds(&self) -> u64;
}

/// Registration of the process with the OS login items.
pub trait AutoLaunch: Send + Sync {
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

/// Wall clock: event timestamps, resume detection and the local calendar
/// date used to key daily stats.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
