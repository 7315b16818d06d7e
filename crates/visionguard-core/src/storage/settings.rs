//! TOML-based user settings.
//!
//! Stores the break cadence and the behaviour switches:
//! - Work duration (minutes) and break duration (seconds)
//! - Strict mode
//! - Notification toggle
//! - What to do when launched by the OS at login
//!
//! Settings are stored at `~/.config/visionguard/settings.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{data_dir, SettingsRepository};
use crate::error::{ConfigError, Result, ValidationError};
use crate::platform::AutoLaunch;

/// Policy for launches that come from the OS auto-start entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupMode {
    /// Start the timer silently.
    Auto,
    /// Ask before starting the timer.
    Prompt,
    /// Do not run at all.
    #[default]
    Disabled,
}

impl StartupMode {
    /// Whether an auto-start entry should exist for this mode.
    pub fn launches_at_login(self) -> bool {
        matches!(self, StartupMode::Auto | StartupMode::Prompt)
    }
}

impl fmt::Display for StartupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StartupMode::Auto => "auto",
            StartupMode::Prompt => "prompt",
            StartupMode::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

impl FromStr for StartupMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(StartupMode::Auto),
            "prompt" => Ok(StartupMode::Prompt),
            "disabled" => Ok(StartupMode::Disabled),
            other => Err(ValidationError::InvalidValue {
                field: "startup_mode".into(),
                message: format!("expected auto, prompt or disabled, got '{other}'"),
            }),
        }
    }
}

/// User settings.
///
/// Always replaced wholesale; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_work_duration")]
    pub work_duration_minutes: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration_seconds: u32,
    #[serde(default)]
    pub is_strict: bool,
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
    #[serde(default)]
    pub startup_mode: StartupMode,
}

fn default_work_duration() -> u32 {
    20
}
fn default_break_duration() -> u32 {
    20
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration_minutes: default_work_duration(),
            break_duration_seconds: default_break_duration(),
            is_strict: false,
            enable_notifications: true,
            startup_mode: StartupMode::default(),
        }
    }
}

impl Settings {
    /// Length of a working phase in seconds.
    pub fn work_seconds(&self) -> u64 {
        u64::from(self.work_duration_minutes) * 60
    }

    /// Length of a break in seconds.
    pub fn break_seconds(&self) -> u64 {
        u64::from(self.break_duration_seconds)
    }

    /// Both durations must be positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.work_duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "work_duration_minutes".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.break_duration_seconds == 0 {
            return Err(ValidationError::InvalidValue {
                field: "break_duration_seconds".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Settings persisted as a TOML file.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Settings file at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file at `~/.config/visionguard/settings.toml`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("settings.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsRepository for SettingsFile {
    fn load(&self) -> Result<Settings> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let settings: Settings =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })?;
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Settings::default();
                self.save(&settings)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }
}

/// Validate and persist `next`, then re-register auto-launch if the startup
/// mode changed. Registration failures are logged, not returned.
///
/// # Errors
/// Returns an error if `next` is invalid or cannot be saved.
pub fn commit_settings(
    repo: &dyn SettingsRepository,
    autostart: &dyn AutoLaunch,
    previous: &Settings,
    next: &Settings,
) -> Result<()> {
    next.validate()?;
    repo.save(next)?;

    if previous.startup_mode != next.startup_mode {
        let enabled = next.startup_mode.launches_at_login();
        match autostart.set_enabled(enabled) {
            Ok(()) => tracing::info!(mode = %next.startup_mode, enabled, "auto-launch updated"),
            Err(e) => tracing::warn!(error = %e, "failed to update auto-launch registration"),
        }
    }
    Ok(())
}
