//! The scheduled task that drives the timer.
//!
//! [`Service`] owns the [`TimerEngine`] and a one-second interval. Observers
//! talk to it through a cloneable [`ServiceHandle`]; their commands are
//! queued onto the same task as the tick, so every mutation runs to
//! completion before the next one starts.

use std::future::Future;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{CoreError, Result};
use crate::lifecycle::ResumeDetector;
use crate::stats::StatsLedger;
use crate::storage::Settings;
use crate::timer::{StatusSnapshot, TimerEngine};

const TICK: Duration = Duration::from_secs(1);

enum Command {
    Status(oneshot::Sender<StatusSnapshot>),
    Subscribe(oneshot::Sender<broadcast::Receiver<StatusSnapshot>>),
    SkipBreak,
    Settings(oneshot::Sender<Settings>),
    SetSettings(Settings, oneshot::Sender<Result<bool>>),
    Stats(oneshot::Sender<StatsLedger>),
    Activate,
    Shutdown,
}

/// Owner of the timer engine and its tick.
///
/// The service starts inactive: it answers queries but does not count down
/// until [`ServiceHandle::activate`] is called.
pub struct Service {
    engine: TimerEngine,
    commands: mpsc::UnboundedReceiver<Command>,
    active: bool,
    resume: ResumeDetector,
}

/// Client side of a running [`Service`].
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl Service {
    pub fn new(engine: TimerEngine) -> (Self, ServiceHandle) {
        let (tx, commands) = mpsc::unbounded_channel();
        let service = Self {
            engine,
            commands,
            active: false,
            resume: ResumeDetector::default(),
        };
        (service, ServiceHandle { tx })
    }

    /// Run until `shutdown` resolves or a shutdown command arrives.
    ///
    /// Ticks that are late (e.g. the process was suspended) are delayed, not
    /// replayed: there is no catch-up accounting for missed seconds.
    pub async fn run<F>(mut self, shutdown: F) -> TimerEngine
    where
        F: Future<Output = ()>,
    {
        let mut interval = time::interval_at(Instant::now() + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!("timer service started");
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown signal received");
                    break;
                }
                _ = interval.tick() => self.on_tick(),
                Some(command) = self.commands.recv() => {
                    if !self.handle(command) {
                        break;
                    }
                }
            }
        }
        tracing::info!("timer service stopped");
        self.engine
    }

    fn on_tick(&mut self) {
        let resumed = self.resume.observe(self.engine.now());
        if !self.active {
            return;
        }
        if resumed {
            tracing::info!("system resumed from sleep");
            self.engine.welcome();
        }
        if let Some(event) = self.engine.tick() {
            tracing::debug!(?event, "timer event");
        }
    }

    /// Returns false when the loop should stop.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Status(reply) => {
                let _ = reply.send(self.engine.status());
            }
            Command::Subscribe(reply) => {
                let _ = reply.send(self.engine.subscribe());
            }
            Command::SkipBreak => {
                if let Some(event) = self.engine.skip_break() {
                    tracing::debug!(?event, "break skipped");
                }
            }
            Command::Settings(reply) => {
                let _ = reply.send(self.engine.settings().clone());
            }
            Command::SetSettings(settings, reply) => {
                let result = self.engine.set_settings(settings);
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "settings rejected");
                }
                let _ = reply.send(result);
            }
            Command::Stats(reply) => {
                let _ = reply.send(self.engine.stats().clone());
            }
            Command::Activate => {
                if !self.active {
                    self.active = true;
                    tracing::info!("timer activated");
                    self.engine.welcome();
                }
            }
            Command::Shutdown => {
                tracing::info!("shutdown requested");
                return false;
            }
        }
        true
    }
}

impl ServiceHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply))?;
        rx.await.map_err(|_| CoreError::ServiceStopped)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| CoreError::ServiceStopped)
    }

    pub async fn status(&self) -> Result<StatusSnapshot> {
        self.request(Command::Status).await
    }

    /// Push channel of snapshots: one after every counted tick and after
    /// every skip or settings change.
    pub async fn subscribe(&self) -> Result<broadcast::Receiver<StatusSnapshot>> {
        self.request(Command::Subscribe).await
    }

    /// Fire-and-forget.
    pub fn skip_break(&self) -> Result<()> {
        self.send(Command::SkipBreak)
    }

    pub async fn settings(&self) -> Result<Settings> {
        self.request(Command::Settings).await
    }

    pub async fn set_settings(&self, settings: Settings) -> Result<bool> {
        self.request(|reply| Command::SetSettings(settings, reply))
            .await?
    }

    pub async fn stats(&self) -> Result<StatsLedger> {
        self.request(Command::Stats).await
    }

    /// Start counting down (no-op if already active).
    pub fn activate(&self) -> Result<()> {
        self.send(Command::Activate)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }
}
