use clap::Subcommand;
use visionguard_core::error::Result as CoreResult;
use visionguard_core::storage::commit_settings;
use visionguard_core::{AutoLaunch, Settings, SettingsFile, SettingsRepository, StartupMode};

use super::CommandResult;
use crate::ipc::{Client, ClientError, Request, Response};
use crate::platform::XdgAutostart;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the current settings
    Show,
    /// Change one or more settings
    Set {
        /// Minutes of screen time between breaks
        #[arg(long)]
        work_minutes: Option<u32>,
        /// Length of a break in seconds
        #[arg(long)]
        break_seconds: Option<u32>,
        /// Hide the skip option during breaks
        #[arg(long)]
        strict: Option<bool>,
        /// Show desktop notifications
        #[arg(long)]
        notifications: Option<bool>,
        /// What to do when launched at login (auto, prompt, disabled)
        #[arg(long)]
        startup_mode: Option<StartupMode>,
    },
    /// Reset settings to defaults
    Reset,
}

/// Settings after `action`, or `None` if it changes nothing.
fn updated(mut settings: Settings, action: SettingsAction) -> Option<Settings> {
    match action {
        SettingsAction::Show => None,
        SettingsAction::Set {
            work_minutes,
            break_seconds,
            strict,
            notifications,
            startup_mode,
        } => {
            if let Some(v) = work_minutes {
                settings.work_duration_minutes = v;
            }
            if let Some(v) = break_seconds {
                settings.break_duration_seconds = v;
            }
            if let Some(v) = strict {
                settings.is_strict = v;
            }
            if let Some(v) = notifications {
                settings.enable_notifications = v;
            }
            if let Some(v) = startup_mode {
                settings.startup_mode = v;
            }
            Some(settings)
        }
        SettingsAction::Reset => Some(Settings::default()),
    }
}

pub fn run(action: SettingsAction) -> CommandResult {
    // A running daemon owns the settings; edit the file only when there is none.
    let settings = match Client::connect_default() {
        Ok(client) => through_daemon(client, action)?,
        Err(_) => {
            tracing::debug!("no daemon running, editing the settings file");
            let file = SettingsFile::open_default()?;
            let autostart = XdgAutostart::for_current_user()?;
            offline(&file, &autostart, action)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn through_daemon(mut client: Client, action: SettingsAction) -> Result<Settings, ClientError> {
    let current = match client.call(&Request::GetSettings)? {
        Response::Settings { settings } => settings,
        other => return Err(ClientError::Unexpected(other)),
    };
    let Some(next) = updated(current.clone(), action) else {
        return Ok(current);
    };
    match client.call(&Request::SetSettings {
        settings: next.clone(),
    })? {
        Response::Ack => Ok(next),
        other => Err(ClientError::Unexpected(other)),
    }
}

fn offline(
    file: &SettingsFile,
    autostart: &dyn AutoLaunch,
    action: SettingsAction,
) -> CoreResult<Settings> {
    let current = file.load()?;
    let Some(next) = updated(current.clone(), action) else {
        return Ok(current);
    };
    commit_settings(file, autostart, &current, &next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use visionguard_core::CoreError;

    fn set() -> SettingsAction {
        SettingsAction::Set {
            work_minutes: None,
            break_seconds: None,
            strict: None,
            notifications: None,
            startup_mode: None,
        }
    }

    #[test]
    fn set_changes_only_given_fields() {
        let action = SettingsAction::Set {
            work_minutes: Some(25),
            break_seconds: None,
            strict: Some(true),
            notifications: None,
            startup_mode: None,
        };
        let next = updated(Settings::default(), action).unwrap();
        assert_eq!(next.work_duration_minutes, 25);
        assert!(next.is_strict);
        assert_eq!(next.break_duration_seconds, 20);
        assert!(next.enable_notifications);
        assert_eq!(next.startup_mode, StartupMode::Disabled);
    }

    #[test]
    fn offline_set_persists_and_registers_autostart() {
        let dir = TempDir::new().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.toml"));
        let autostart = XdgAutostart::new(dir.path().join("autostart"), "visionguard");

        let action = SettingsAction::Set {
            work_minutes: None,
            break_seconds: None,
            strict: None,
            notifications: None,
            startup_mode: Some(StartupMode::Prompt),
        };
        let next = offline(&file, &autostart, action).unwrap();
        assert_eq!(next.startup_mode, StartupMode::Prompt);
        assert_eq!(file.load().unwrap(), next);
        assert!(autostart.entry_path().exists());

        offline(&file, &autostart, SettingsAction::Reset).unwrap();
        assert_eq!(file.load().unwrap(), Settings::default());
        assert!(!autostart.entry_path().exists());
    }

    #[test]
    fn offline_rejects_zero_durations_and_keeps_file() {
        let dir = TempDir::new().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.toml"));
        let autostart = XdgAutostart::new(dir.path().join("autostart"), "visionguard");

        let action = SettingsAction::Set {
            work_minutes: None,
            break_seconds: Some(0),
            strict: None,
            notifications: None,
            startup_mode: None,
        };
        let err = offline(&file, &autostart, action).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(file.load().unwrap(), Settings::default());
    }

    #[test]
    fn show_changes_nothing() {
        assert!(updated(Settings::default(), SettingsAction::Show).is_none());
        assert!(updated(Settings::default(), set()).is_some());
    }
}
