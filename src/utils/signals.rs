//! Signal handling for graceful shutdown and settings reload

use std::sync::Arc;

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

use crate::settings::TimerSettings;

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = Signals::new(&[
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]).expect("Failed to create signal handler");

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
        break;
    }
}

/// Re-read the settings file whenever SIGHUP arrives
///
/// Lets external tools edit the file and nudge a running server without a
/// restart; the engine picks the change up through the usual settings
/// notification path.
pub async fn reload_task(settings: Arc<TimerSettings>) {
    let mut signals = Signals::new(&[signal_hook::consts::SIGHUP])
        .expect("Failed to create signal handler");

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}, reloading settings", signal);
        settings.reload();
    }
}
