//! Take Five - A state-managed HTTP server for Pomodoro work/break cycling
//!
//! This is the main entry point for the take-five application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use take_five::{
    api::create_router,
    config::Config,
    services::{DesktopNotifier, DesktopSound, NotificationService, SoundService},
    settings::TimerSettings,
    state::{AppState, TimerEngine},
    utils::{reload_task, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("take_five={},tower_http=info", config.log_level()))
        .init();

    info!("Starting take-five server v1.1.0");

    // Load persisted settings
    let settings_path = config.settings_path()?;
    info!("Configuration: host={}, port={}, settings={}",
          config.host, config.port, settings_path.display());
    let settings = Arc::new(TimerSettings::load(settings_path)?);
    info!("Durations: work={}min, short break={}min, long break={}min",
          settings.work_minutes(),
          settings.short_break_minutes(),
          settings.long_break_minutes());

    // Wire up the side-effect services and the timer engine
    let sound: Arc<dyn SoundService> = Arc::new(DesktopSound::new());
    let notifier: Arc<dyn NotificationService> = Arc::new(DesktopNotifier::new());
    notifier.request_authorization();
    let engine = TimerEngine::new(settings.clone(), sound, notifier.clone());

    // Create application state
    let state = Arc::new(AppState::new(
        engine,
        settings.clone(),
        notifier.clone(),
        config.port,
        config.host.clone(),
    ));

    // Reload the settings file on SIGHUP
    let reload_settings = Arc::clone(&settings);
    tokio::spawn(async move {
        reload_task(reload_settings).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start or resume the timer");
    info!("  POST /pause          - Pause the running timer");
    info!("  POST /reset          - Reset the current session");
    info!("  POST /skip           - Skip to the next session");
    info!("  GET  /status         - Check timer status and settings");
    info!("  GET  /settings       - Read persisted settings");
    info!("  PUT  /settings       - Update persisted settings");
    info!("  POST /settings/reset - Restore default durations");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    notifier.cancel_all();
    info!("Server shutdown complete");
    Ok(())
}
