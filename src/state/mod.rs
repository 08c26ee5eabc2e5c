//! State management module
//!
//! This module contains the timer state machine and the shared application
//! state handed to the HTTP layer.

pub mod app_state;
pub mod engine;
pub mod session;

// Re-export main types
pub use app_state::AppState;
pub use engine::TimerEngine;
pub(crate) use engine::TickOutcome;
pub use session::{format_clock, SessionType, TimerSnapshot, TimerState};
