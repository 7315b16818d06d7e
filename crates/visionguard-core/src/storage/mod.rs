mod database;
pub mod migrations;
mod settings;

pub use database::StatsDb;
pub use settings::{commit_settings, Settings, SettingsFile, StartupMode};

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::stats::{DailyStat, StatsLedger};

/// Typed access to the persisted settings record.
pub trait SettingsRepository: Send {
    /// Load the settings, writing the defaults on first run.
    fn load(&self) -> Result<Settings>;

    /// Replace the stored settings wholesale.
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Typed access to the persisted per-day statistics.
pub trait StatsRepository: Send {
    /// Every stored day.
    fn load_all(&self) -> Result<StatsLedger>;

    /// Store the absolute totals for one day.
    fn put(&self, date: NaiveDate, stat: &DailyStat) -> Result<()>;
}

/// Returns `~/.config/visionguard[-dev]/` based on VISIONGUARD_ENV.
///
/// Set VISIONGUARD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoDataDir)?
        .join(".config");

    let env = std::env::var("VISIONGUARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("visionguard-dev")
    } else {
        base_dir.join("visionguard")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
