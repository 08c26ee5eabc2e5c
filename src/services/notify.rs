//! Desktop notification dispatch

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::state::SessionType;

/// Session-completion notifications
///
/// Calls return immediately; delivery failures are logged, never surfaced
/// to the caller.
pub trait NotificationService: Send + Sync {
    /// Ask the platform for permission to notify; the outcome is logged
    fn request_authorization(&self);
    /// Whether notifications can currently be delivered
    fn check_authorization(&self) -> bool;
    /// Announce a finished session, carrying the running work-session count
    fn send_completion(&self, session: SessionType, completed_work_sessions: u32);
    /// Withdraw any notifications still pending
    fn cancel_all(&self);
}

/// Sends notifications through notify-send
pub struct DesktopNotifier {
    available: Arc<AtomicBool>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService for DesktopNotifier {
    fn request_authorization(&self) {
        let available = Arc::clone(&self.available);
        tokio::spawn(async move {
            match check_notify_send_available().await {
                Ok(()) => {
                    available.store(true, Ordering::Relaxed);
                    info!("Desktop notifications are available");
                }
                Err(e) => {
                    available.store(false, Ordering::Relaxed);
                    warn!("Desktop notifications are unavailable: {}", e);
                }
            }
        });
    }

    fn check_authorization(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    fn send_completion(&self, session: SessionType, completed_work_sessions: u32) {
        let (title, body) = completion_text(session, completed_work_sessions);
        tokio::spawn(async move {
            if let Err(e) = send_notification(&title, &body).await {
                warn!("Failed to send completion notification: {}", e);
            }
        });
    }

    fn cancel_all(&self) {
        // notify-send cannot withdraw notifications it already posted
        debug!("Notification cancellation requested, nothing to withdraw");
    }
}

/// Title and body for a completion notice
fn completion_text(session: SessionType, completed_work_sessions: u32) -> (String, String) {
    match session {
        SessionType::Work => (
            "Work session complete!".to_string(),
            format!(
                "You've completed {} pomodoro{}. Time for a break!",
                completed_work_sessions,
                if completed_work_sessions == 1 { "" } else { "s" }
            ),
        ),
        SessionType::ShortBreak | SessionType::LongBreak => (
            "Break finished".to_string(),
            "Ready to start a new work session?".to_string(),
        ),
    }
}

async fn send_notification(title: &str, body: &str) -> Result<(), String> {
    let output = Command::new("notify-send")
        .args(&["--app-name", "take-five", title, body])
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("notify-send failed: {}", stderr));
    }

    Ok(())
}

/// Check if notify-send is available on the system
async fn check_notify_send_available() -> Result<(), String> {
    Command::new("notify-send")
        .arg("--version")
        .output()
        .await
        .map_err(|_| "notify-send is not installed".to_string())?;

    Ok(())
}
