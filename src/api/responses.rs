//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{SettingsValues, TimerSettings, ViewStyle};
use crate::state::TimerSnapshot;

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a response around the timer state after an operation; the
    /// status field carries the resulting timer state
    pub fn from_snapshot(message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.state.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Enhanced status response with settings and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub formatted_time: String,
    pub progress: f64,
    pub settings: SettingsValues,
    pub notifications_available: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Current settings with a timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: SettingsValues,
    pub timestamp: DateTime<Utc>,
}

impl SettingsResponse {
    pub fn current(settings: &TimerSettings) -> Self {
        Self {
            settings: settings.snapshot(),
            timestamp: Utc::now(),
        }
    }
}

/// Partial settings update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub work_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub view_style: Option<ViewStyle>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.1.0".to_string(),
        }
    }
}
