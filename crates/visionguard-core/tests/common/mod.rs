//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use visionguard_core::error::Result;
use visionguard_core::{
    AutoLaunch, Clock, Collaborators, IdleSource, Notifier, Overlay, PromptResponse, Settings,
    SettingsRepository, StatsDb, TimerEngine,
};

/// Side effect observed by a double, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Warn,
    Complete,
    Welcome,
    Show(u64),
    Hide,
    AutoLaunch(bool),
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Call>>>);

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }
}

impl Notifier for Recorder {
    fn break_incoming(&self) {
        self.push(Call::Warn);
    }
    fn break_complete(&self) {
        self.push(Call::Complete);
    }
    fn welcome(&self) {
        self.push(Call::Welcome);
    }
    fn prompt_start(&self) -> PromptResponse {
        PromptResponse::Accepted
    }
}

impl Overlay for Recorder {
    fn show(&mut self, break_seconds: u64, _strict: bool) {
        self.push(Call::Show(break_seconds));
    }
    fn hide(&mut self) {
        self.push(Call::Hide);
    }
}

impl AutoLaunch for Recorder {
    fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.push(Call::AutoLaunch(enabled));
        Ok(())
    }
}

/// Idle time the test can change while the engine owns the source.
#[derive(Clone, Default)]
pub struct IdleKnob(Arc<AtomicU64>);

impl IdleKnob {
    pub fn set(&self, seconds: u64) {
        self.0.store(seconds, Ordering::SeqCst);
    }
}

impl IdleSource for IdleKnob {
    fn idle_seconds(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Settings kept in memory; the test keeps a clone to inspect saves.
#[derive(Clone, Default)]
pub struct MemorySettings(Arc<Mutex<Settings>>);

impl MemorySettings {
    pub fn with(settings: Settings) -> Self {
        Self(Arc::new(Mutex::new(settings)))
    }

    pub fn stored(&self) -> Settings {
        self.0.lock().unwrap().clone()
    }
}

impl SettingsRepository for MemorySettings {
    fn load(&self) -> Result<Settings> {
        Ok(self.stored())
    }
    fn save(&self, settings: &Settings) -> Result<()> {
        *self.0.lock().unwrap() = settings.clone();
        Ok(())
    }
}

/// Wall clock that only moves when the test says so. Starts at noon UTC on
/// [`today`].
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl Default for ManualClock {
    fn default() -> Self {
        let noon = today().and_hms_opt(12, 0, 0).unwrap().and_utc();
        Self(Arc::new(Mutex::new(noon)))
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// An engine wired to doubles, plus handles to observe them.
pub struct Rig {
    pub engine: TimerEngine,
    pub recorder: Recorder,
    pub idle: IdleKnob,
    pub settings: MemorySettings,
    pub clock: ManualClock,
}

pub fn rig(settings: Settings) -> Rig {
    let recorder = Recorder::default();
    let idle = IdleKnob::default();
    let repo = MemorySettings::with(settings);
    let clock = ManualClock::default();
    let engine = TimerEngine::new(Collaborators {
        settings: Box::new(repo.clone()),
        stats: Box::new(StatsDb::open_memory().unwrap()),
        idle: Box::new(idle.clone()),
        notifier: Box::new(recorder.clone()),
        overlay: Box::new(recorder.clone()),
        autostart: Box::new(recorder.clone()),
        clock: Box::new(clock.clone()),
    })
    .unwrap();
    Rig {
        engine,
        recorder,
        idle,
        settings: repo,
        clock,
    }
}

pub fn ticks(engine: &mut TimerEngine, n: u64) {
    for _ in 0..n {
        engine.tick();
    }
}
