//! Sound and haptic feedback playback

use tokio::process::Command;
use tracing::{debug, warn};

/// Sound and haptic cues fired at timer transition points
///
/// Calls return immediately; playback failures are logged, never surfaced
/// to the caller.
pub trait SoundService: Send + Sync {
    /// Session started or resumed
    fn play_start(&self);
    /// Countdown paused
    fn play_pause(&self);
    /// Timer reset
    fn play_reset(&self);
    /// Session completed
    fn play_complete(&self);
    /// Subtle tap accompanying start and pause
    fn light_impact(&self);
    /// Celebratory buzz accompanying completion
    fn success_feedback(&self);
}

/// Plays freedesktop sound theme events through canberra-gtk-play
///
/// Start, pause, and reset share one event; completion gets a distinct one.
pub struct DesktopSound;

impl DesktopSound {
    pub fn new() -> Self {
        Self
    }

    fn play_event(&self, event: &'static str) {
        tokio::spawn(async move {
            if let Err(e) = play_sound_event(event).await {
                warn!("Failed to play '{}' sound: {}", event, e);
            }
        });
    }
}

impl Default for DesktopSound {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundService for DesktopSound {
    fn play_start(&self) {
        self.play_event("bell");
    }

    fn play_pause(&self) {
        self.play_event("bell");
    }

    fn play_reset(&self) {
        self.play_event("bell");
    }

    fn play_complete(&self) {
        self.play_event("complete");
    }

    fn light_impact(&self) {
        debug!("Haptic feedback not available on this platform");
    }

    fn success_feedback(&self) {
        debug!("Haptic feedback not available on this platform");
    }
}

/// Play a sound theme event by id
async fn play_sound_event(event: &str) -> Result<(), String> {
    let output = Command::new("canberra-gtk-play")
        .args(&["-i", event])
        .output()
        .await
        .map_err(|e| format!("Failed to execute canberra-gtk-play: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("canberra-gtk-play failed: {}", stderr));
    }

    Ok(())
}
