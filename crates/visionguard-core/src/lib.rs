//! # VisionGuard Core Library
//!
//! Business logic for the VisionGuard eye-care reminder. The binary crate is a
//! thin daemon and control surface over this library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a two-phase (working / on break) countdown that the caller
//!   drives with one `tick()` per second
//! - **Storage**: TOML settings file and SQLite-backed daily statistics, both
//!   behind typed repository traits
//! - **Platform**: traits for the side effects the engine triggers (notifications,
//!   the break overlay, idle time, auto-launch registration)
//! - **Service**: the single task that owns the engine, its one-second interval
//!   and the command channel used by observers
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: phase state machine
//! - [`Service`] / [`ServiceHandle`]: scheduled-task owner and its client handle
//! - [`Settings`]: persisted user configuration
//! - [`StatsLedger`]: per-day screen time and break counts

pub mod broadcast;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod platform;
pub mod service;
pub mod stats;
pub mod storage;
pub mod timer;

pub use broadcast::StatusBroadcast;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use lifecycle::{LaunchPlan, ResumeDetector};
pub use platform::{AutoLaunch, Clock, IdleSource, Notifier, Overlay, PromptResponse, SystemClock};
pub use service::{Service, ServiceHandle};
pub use stats::{DailyStat, StatsLedger, StatsSummary};
pub use storage::{Settings, SettingsFile, SettingsRepository, StartupMode, StatsDb, StatsRepository};
pub use timer::{Collaborators, Phase, StatusSnapshot, TimerEngine, TimerState};
