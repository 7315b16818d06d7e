use visionguard_core::IdleSource;

/// Reports the user as always present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdle;

impl IdleSource for NoIdle {
    fn idle_seconds(&self) -> u64 {
        0
    }
}

/// Best idle source for this session; falls back to [`NoIdle`].
pub fn detect_idle_source() -> Box<dyn IdleSource> {
    #[cfg(target_os = "linux")]
    {
        if let Some(source) = x11::ScreenSaverIdle::connect() {
            tracing::debug!("using X11 screensaver idle time");
            return Box::new(source);
        }
    }
    tracing::warn!("idle detection unavailable, all time counts as screen time");
    Box::new(NoIdle)
}

#[cfg(target_os = "linux")]
mod x11 {
    use visionguard_core::IdleSource;
    use x11rb::connection::Connection;
    use x11rb::protocol::screensaver;
    use x11rb::protocol::xproto::Window;
    use x11rb::rust_connection::RustConnection;

    /// Idle time from the MIT-SCREEN-SAVER extension.
    pub struct ScreenSaverIdle {
        conn: RustConnection,
        root: Window,
    }

    impl ScreenSaverIdle {
        pub fn connect() -> Option<Self> {
            let (conn, screen_num) = x11rb::connect(None).ok()?;
            let root = conn.setup().roots.get(screen_num)?.root;
            Some(Self { conn, root })
        }
    }

    impl IdleSource for ScreenSaverIdle {
        fn idle_seconds(&self) -> u64 {
            let info = screensaver::query_info(&self.conn, self.root)
                .ok()
                .and_then(|cookie| cookie.reply().ok());

            info.map(|i| u64::from(i.ms_since_user_input / 1000))
                .unwrap_or(0)
        }
    }

}
