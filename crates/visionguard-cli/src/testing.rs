//! Engine wiring shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use visionguard_core::{
    Collaborators, Notifier, PromptResponse, SettingsFile, StatsDb, SystemClock, TimerEngine,
};

use crate::platform::{ConsoleOverlay, NoIdle, XdgAutostart};

/// Notifier that answers the startup prompt with a fixed response and counts
/// welcome notifications.
#[derive(Clone)]
pub struct Scripted {
    answer: PromptResponse,
    welcomes: Arc<AtomicUsize>,
}

impl Scripted {
    pub fn new(answer: PromptResponse) -> Self {
        Self {
            answer,
            welcomes: Arc::default(),
        }
    }

    pub fn welcomes(&self) -> usize {
        self.welcomes.load(Ordering::SeqCst)
    }
}

impl Notifier for Scripted {
    fn break_incoming(&self) {}
    fn break_complete(&self) {}
    fn welcome(&self) {
        self.welcomes.fetch_add(1, Ordering::SeqCst);
    }
    fn prompt_start(&self) -> PromptResponse {
        self.answer
    }
}

/// Engine on default settings stored under `dir`, with in-memory stats.
pub fn engine(dir: &TempDir, notifier: Scripted) -> TimerEngine {
    TimerEngine::new(Collaborators {
        settings: Box::new(SettingsFile::new(dir.path().join("settings.toml"))),
        stats: Box::new(StatsDb::open_memory().unwrap()),
        idle: Box::new(NoIdle),
        notifier: Box::new(notifier),
        overlay: Box::new(ConsoleOverlay::new(std::io::sink())),
        autostart: Box::new(XdgAutostart::new(dir.path().join("autostart"), "visionguard")),
        clock: Box::new(SystemClock),
    })
    .unwrap()
}
