//! Side-effecting collaborator services
//!
//! Sound cues and desktop notifications fired at timer transition points.
//! Everything here is fire-and-forget: failures are logged, never returned
//! to the timer engine.

pub mod notify;
pub mod sound;

// Re-export main types
pub use notify::{DesktopNotifier, NotificationService};
pub use sound::{DesktopSound, SoundService};
