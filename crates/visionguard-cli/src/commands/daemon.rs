use std::time::Duration;

use visionguard_core::error::Result as CoreResult;
use visionguard_core::{
    Collaborators, LaunchPlan, Notifier, PromptResponse, Service, ServiceHandle, SettingsFile,
    SettingsRepository, StatsDb, SystemClock, TimerEngine,
};

use super::CommandResult;
use crate::ipc::{self, Client};
use crate::platform::{detect_idle_source, ConsoleOverlay, DesktopNotifier, XdgAutostart};

pub fn run(startup: bool) -> CommandResult {
    let settings_file = SettingsFile::open_default()?;
    let settings = settings_file.load()?;
    let plan = LaunchPlan::resolve(startup, settings.startup_mode);
    tracing::info!(?plan, startup, mode = %settings.startup_mode, "launch");
    if plan == LaunchPlan::Exit {
        return Ok(());
    }

    let socket = ipc::socket_path();
    if Client::connect(&socket).is_ok() {
        return Err(format!("visionguard is already running ({})", socket.display()).into());
    }

    let engine = TimerEngine::new(Collaborators {
        settings: Box::new(settings_file),
        stats: Box::new(StatsDb::open()?),
        idle: detect_idle_source(),
        notifier: Box::new(DesktopNotifier),
        overlay: Box::new(ConsoleOverlay::stdout()),
        autostart: Box::new(XdgAutostart::for_current_user()?),
        clock: Box::new(SystemClock),
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let listener = ipc::bind(&socket)?;
        let (service, handle) = Service::new(engine);
        let server = tokio::spawn(ipc::server::serve(listener, handle.clone()));

        match plan {
            LaunchPlan::Start => handle.activate()?,
            LaunchPlan::Prompt => prompt(handle),
            LaunchPlan::Exit => {}
        }

        service.run(shutdown_signal()).await;
        server.abort();
        Ok::<(), Box<dyn std::error::Error>>(())
    });

    if let Err(e) = std::fs::remove_file(&socket) {
        tracing::debug!(error = %e, "socket already gone");
    }
    // An unanswered startup prompt holds a blocking thread.
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Ask on a blocking thread; the service answers queries meanwhile but does
/// not count until the user accepts.
fn prompt(handle: ServiceHandle) {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = answer_prompt(&DesktopNotifier, &handle) {
            tracing::debug!(error = %e, "prompt answered after shutdown");
        }
    });
}

/// Activates the timer if the user accepts. Returns whether it did.
fn answer_prompt(notifier: &dyn Notifier, handle: &ServiceHandle) -> CoreResult<bool> {
    match notifier.prompt_start() {
        PromptResponse::Accepted => {
            handle.activate()?;
            Ok(true)
        }
        PromptResponse::Declined => {
            tracing::info!("startup prompt dismissed, run `visionguard start` to begin");
            Ok(false)
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
