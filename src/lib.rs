//! Take Five - A state-managed HTTP server for Pomodoro work/break cycling
//!
//! This library provides a Pomodoro timer state machine driven over HTTP:
//! alternating work and break sessions, a one-second countdown, persisted
//! durations, and sound/notification hooks at the transition points.

pub mod api;
pub mod config;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use services::{DesktopNotifier, DesktopSound, NotificationService, SoundService};
pub use settings::{SettingsValues, TimerSettings, ViewStyle};
pub use state::{AppState, SessionType, TimerEngine, TimerSnapshot, TimerState};
pub use utils::signals::shutdown_signal;
