use std::path::PathBuf;

use visionguard_core::error::Result;
use visionguard_core::{AutoLaunch, ConfigError};

const ENTRY_NAME: &str = "visionguard.desktop";

/// Login item as an XDG autostart desktop entry.
#[derive(Debug, Clone)]
pub struct XdgAutostart {
    dir: PathBuf,
    exec: PathBuf,
}

impl XdgAutostart {
    pub fn new(dir: impl Into<PathBuf>, exec: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            exec: exec.into(),
        }
    }

    /// `~/.config/autostart`, launching the current executable.
    pub fn for_current_user() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or(ConfigError::NoDataDir)?
            .join("autostart");
        Ok(Self::new(dir, std::env::current_exe()?))
    }

    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(ENTRY_NAME)
    }

    fn entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=VisionGuard\n\
             Comment=20-20-20 eye-care break reminder\n\
             Exec=\"{}\" run --startup\n\
             Terminal=false\n\
             X-GNOME-Autostart-enabled=true\n",
            self.exec.display()
        )
    }
}

impl AutoLaunch for XdgAutostart {
    fn set_enabled(&self, enabled: bool) -> Result<()> {
        let path = self.entry_path();
        if enabled {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(&path, self.entry())?;
            tracing::debug!(?path, "autostart entry written");
        } else {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(?path, "autostart entry removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
