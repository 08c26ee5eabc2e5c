//! Settings-change listener task

use std::sync::Weak;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::settings::SettingsValues;
use crate::state::TimerEngine;

/// Forward settings changes to the engine
///
/// The engine reads the live values when it applies a change, so a lagged
/// receiver only needs to apply once to catch up. Runs for the lifetime of
/// the engine; the handle is aborted on drop.
pub(crate) async fn settings_watch_task(
    engine: Weak<TimerEngine>,
    mut settings_rx: broadcast::Receiver<SettingsValues>,
) {
    loop {
        match settings_rx.recv().await {
            Ok(values) => {
                debug!(
                    "Settings changed: work={}m short_break={}m long_break={}m",
                    values.work_minutes, values.short_break_minutes, values.long_break_minutes
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Settings listener lagged, {} updates coalesced", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Settings channel closed, listener stopping");
                break;
            }
        }

        let Some(engine) = engine.upgrade() else {
            break;
        };
        engine.apply_settings_change();
    }
}
