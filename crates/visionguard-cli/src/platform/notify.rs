use notify_rust::Notification;
use visionguard_core::{Notifier, PromptResponse};

const APP_NAME: &str = "VisionGuard";
const ICON: &str = "preferences-desktop-accessibility";

/// Freedesktop (or platform) notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn notification(summary: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(summary)
            .body(body)
            .icon(ICON);
        notification
    }

    fn send(summary: &str, body: &str) {
        if let Err(e) = Self::notification(summary, body).show() {
            tracing::warn!(error = %e, summary, "failed to show notification");
        }
    }
}

impl Notifier for DesktopNotifier {
    fn break_incoming(&self) {
        Self::send("Break Coming Up", "Prepare to look away in 10 seconds...");
    }

    fn break_complete(&self) {
        Self::send("Break Complete", "Great job! You can focus again now.");
    }

    fn welcome(&self) {
        Self::send(
            "VisionGuard Active",
            "Your eye health companion is running in the background.",
        );
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn prompt_start(&self) -> PromptResponse {
        let mut notification = Self::notification(
            "VisionGuard Ready",
            "Do you want to start your eye protection session?",
        );
        notification
            .action("default", "Start Session")
            .action("start", "Start Session")
            .timeout(notify_rust::Timeout::Never);

        let handle = match notification.show() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "failed to show startup prompt");
                return PromptResponse::Declined;
            }
        };

        let mut response = PromptResponse::Declined;
        handle.wait_for_action(|action| {
            if matches!(action, "default" | "start") {
                response = PromptResponse::Accepted;
            }
        });
        response
    }

    /// Without notification actions there is nothing to click, so the
    /// prompt only announces the start.
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn prompt_start(&self) -> PromptResponse {
        Self::send(
            "VisionGuard Ready",
            "Your eye protection session is starting.",
        );
        PromptResponse::Accepted
    }
}
