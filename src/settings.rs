//! Persisted timer settings
//!
//! Session durations live in a JSON file under the user config directory
//! and are clamped to the supported ranges on every write path. Changes
//! are broadcast so an idle timer can pick up new durations immediately.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::state::SessionType;

/// Supported duration ranges in minutes
pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 120);
pub const SHORT_BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);
pub const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (1, 120);

/// How the frontend renders the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewStyle {
    /// Circular progress ring
    #[default]
    Circular,
    /// Draining sandglass
    Sandglass,
}

/// The full set of persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsValues {
    /// Work session duration in minutes.
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Short break duration in minutes.
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes.
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    /// Preferred countdown rendering.
    #[serde(default)]
    pub view_style: ViewStyle,
}

// Default value functions for serde
const fn default_work_minutes() -> u32 {
    25
}

const fn default_short_break() -> u32 {
    5
}

const fn default_long_break() -> u32 {
    15
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            view_style: ViewStyle::default(),
        }
    }
}

impl SettingsValues {
    /// Force every duration into its supported range
    fn clamped(mut self) -> Self {
        self.work_minutes = clamp_minutes("work", self.work_minutes, WORK_MINUTES_RANGE);
        self.short_break_minutes =
            clamp_minutes("short break", self.short_break_minutes, SHORT_BREAK_MINUTES_RANGE);
        self.long_break_minutes =
            clamp_minutes("long break", self.long_break_minutes, LONG_BREAK_MINUTES_RANGE);
        self
    }
}

fn clamp_minutes(key: &str, value: u32, (min, max): (u32, u32)) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(
            "{} duration of {} minutes is outside {}-{}, clamping to {}",
            key, value, min, max, clamped
        );
    }
    clamped
}

/// Settings provider shared between the HTTP layer and the timer engine
pub struct TimerSettings {
    values: Mutex<SettingsValues>,
    path: PathBuf,
    change_tx: broadcast::Sender<SettingsValues>,
}

impl TimerSettings {
    /// Load settings from the given file, falling back to defaults when the
    /// file is missing or unreadable
    pub fn load(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<SettingsValues>(&content) {
                Ok(values) => values.clamped(),
                Err(e) => {
                    warn!(
                        "Settings file {} could not be parsed ({}), using defaults",
                        path.display(),
                        e
                    );
                    SettingsValues::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SettingsValues::default(),
            Err(e) => {
                warn!(
                    "Failed to read settings file {} ({}), using defaults",
                    path.display(),
                    e
                );
                SettingsValues::default()
            }
        };

        let (change_tx, _) = broadcast::channel(16);

        Ok(Self {
            values: Mutex::new(values),
            path,
            change_tx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SettingsValues> {
        // A poisoned lock still holds consistent values
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a copy of the current settings
    pub fn snapshot(&self) -> SettingsValues {
        self.lock().clone()
    }

    pub fn work_minutes(&self) -> u32 {
        self.lock().work_minutes
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.lock().short_break_minutes
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.lock().long_break_minutes
    }

    pub fn view_style(&self) -> ViewStyle {
        self.lock().view_style
    }

    /// Current duration of the given session kind, in seconds
    pub fn duration_secs(&self, session: SessionType) -> u64 {
        let values = self.lock();
        let minutes = match session {
            SessionType::Work => values.work_minutes,
            SessionType::ShortBreak => values.short_break_minutes,
            SessionType::LongBreak => values.long_break_minutes,
        };
        u64::from(minutes) * 60
    }

    /// Set the work session duration, clamped to the supported range
    pub fn set_work_minutes(&self, minutes: u32) {
        let minutes = clamp_minutes("work", minutes, WORK_MINUTES_RANGE);
        let values = {
            let mut guard = self.lock();
            guard.work_minutes = minutes;
            guard.clone()
        };
        info!("Work duration set to {} minutes", minutes);
        self.persist(&values);
        self.notify(values);
    }

    /// Set the short break duration, clamped to the supported range
    pub fn set_short_break_minutes(&self, minutes: u32) {
        let minutes = clamp_minutes("short break", minutes, SHORT_BREAK_MINUTES_RANGE);
        let values = {
            let mut guard = self.lock();
            guard.short_break_minutes = minutes;
            guard.clone()
        };
        info!("Short break duration set to {} minutes", minutes);
        self.persist(&values);
        self.notify(values);
    }

    /// Set the long break duration, clamped to the supported range
    pub fn set_long_break_minutes(&self, minutes: u32) {
        let minutes = clamp_minutes("long break", minutes, LONG_BREAK_MINUTES_RANGE);
        let values = {
            let mut guard = self.lock();
            guard.long_break_minutes = minutes;
            guard.clone()
        };
        info!("Long break duration set to {} minutes", minutes);
        self.persist(&values);
        self.notify(values);
    }

    pub fn set_view_style(&self, style: ViewStyle) {
        let values = {
            let mut guard = self.lock();
            guard.view_style = style;
            guard.clone()
        };
        info!("View style set to {:?}", style);
        self.persist(&values);
        self.notify(values);
    }

    /// Restore all three durations in one step, emitting a single change
    /// notification. The view style is a cosmetic preference and survives.
    pub fn reset_to_defaults(&self) {
        let values = {
            let mut guard = self.lock();
            guard.work_minutes = default_work_minutes();
            guard.short_break_minutes = default_short_break();
            guard.long_break_minutes = default_long_break();
            guard.clone()
        };
        info!("Durations reset to defaults");
        self.persist(&values);
        self.notify(values);
    }

    /// Re-read the settings file, notifying subscribers if anything changed
    pub fn reload(&self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Failed to re-read settings file {}: {}",
                    self.path.display(),
                    e
                );
                return;
            }
        };
        let parsed = match serde_json::from_str::<SettingsValues>(&content) {
            Ok(values) => values.clamped(),
            Err(e) => {
                warn!(
                    "Settings file {} could not be parsed on reload: {}",
                    self.path.display(),
                    e
                );
                return;
            }
        };

        let changed = {
            let mut guard = self.lock();
            if *guard == parsed {
                false
            } else {
                *guard = parsed.clone();
                true
            }
        };

        if changed {
            info!("Settings reloaded from {}", self.path.display());
            self.notify(parsed);
        } else {
            debug!("Settings file unchanged after reload");
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsValues> {
        self.change_tx.subscribe()
    }

    fn persist(&self, values: &SettingsValues) {
        let content = match serde_json::to_string_pretty(values) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize settings: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, content) {
            warn!(
                "Failed to write settings file {}: {}",
                self.path.display(),
                e
            );
        }
    }

    fn notify(&self, values: SettingsValues) {
        if self.change_tx.send(values).is_err() {
            debug!("No settings change subscribers");
        }
    }
}
