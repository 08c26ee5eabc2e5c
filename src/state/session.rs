//! Session types and timer snapshots
//!
//! The Pomodoro cycle alternates work sessions with short breaks, inserting
//! a long break after every fourth completed work session.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// No countdown in progress; remaining time equals the session length
    Idle,
    /// Counting down once per second
    Running,
    /// Countdown halted; remaining time is frozen until resumed
    Paused,
    /// A session just finished; the next one is scheduled
    Completed,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Completed => "completed",
        }
    }
}

/// Kind of session the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }

    /// Human-readable name used in notifications and status output
    pub fn title(&self) -> &'static str {
        match self {
            SessionType::Work => "Work",
            SessionType::ShortBreak => "Short break",
            SessionType::LongBreak => "Long break",
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, SessionType::Work)
    }
}

/// Point-in-time copy of the timer published after every state change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub session: SessionType,
    pub time_remaining_seconds: u64,
    pub session_length_seconds: u64,
    pub completed_work_sessions: u32,
}

impl TimerSnapshot {
    /// Fraction of the current session already elapsed, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.session_length_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.time_remaining_seconds as f64 / self.session_length_seconds as f64)
    }

    /// Remaining time rendered as MM:SS (minutes grow past two digits)
    pub fn formatted_time(&self) -> String {
        format_clock(self.time_remaining_seconds)
    }
}

/// Render a second count as MM:SS
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(125), "02:05");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(7200), "120:00");
    }

    #[test]
    fn serde_names_are_stable() {
        assert_eq!(serde_json::to_string(&SessionType::ShortBreak).unwrap(), "\"short_break\"");
        assert_eq!(serde_json::to_string(&TimerState::Running).unwrap(), "\"running\"");
        let parsed: SessionType = serde_json::from_str("\"long_break\"").unwrap();
        assert_eq!(parsed, SessionType::LongBreak);
    }

    #[test]
    fn progress_spans_the_session() {
        let mut snapshot = TimerSnapshot {
            state: TimerState::Running,
            session: SessionType::Work,
            time_remaining_seconds: 1500,
            session_length_seconds: 1500,
            completed_work_sessions: 0,
        };
        assert_eq!(snapshot.progress(), 0.0);
        snapshot.time_remaining_seconds = 375;
        assert!((snapshot.progress() - 0.75).abs() < f64::EPSILON);
        snapshot.time_remaining_seconds = 0;
        assert_eq!(snapshot.progress(), 1.0);
    }

    #[test]
    fn session_titles() {
        assert_eq!(SessionType::Work.title(), "Work");
        assert_eq!(SessionType::ShortBreak.title(), "Short break");
        assert_eq!(SessionType::LongBreak.title(), "Long break");
    }
}
