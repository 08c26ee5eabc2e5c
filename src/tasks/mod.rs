//! Background tasks module
//!
//! This module contains the tasks the timer engine runs alongside the HTTP
//! server: the one-second countdown, the deferred session advance, and the
//! settings-change listener.

pub mod countdown;
pub mod settings_watch;

// Re-export main functions
pub(crate) use countdown::{advance_delay, countdown_task};
pub(crate) use settings_watch::settings_watch_task;
