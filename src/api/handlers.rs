//! HTTP endpoint handlers
//!
//! Timer operations are total: a request that does not apply in the current
//! state is a no-op, and the response reports the state the timer actually
//! ended up in.

use std::sync::Arc;

use axum::{extract::State, response::Json};

use super::responses::{
    ApiResponse, HealthResponse, SettingsResponse, SettingsUpdate, StatusResponse,
};
use crate::state::AppState;

/// Handle POST /start - Begin or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.engine.start();
    state.record_action("start");
    Json(ApiResponse::from_snapshot(
        "Timer started".to_string(),
        state.engine.snapshot(),
    ))
}

/// Handle POST /pause - Freeze a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.engine.pause();
    state.record_action("pause");
    Json(ApiResponse::from_snapshot(
        "Timer paused".to_string(),
        state.engine.snapshot(),
    ))
}

/// Handle POST /reset - Return to a fresh session of the current kind
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.engine.reset();
    state.record_action("reset");
    Json(ApiResponse::from_snapshot(
        "Timer reset".to_string(),
        state.engine.snapshot(),
    ))
}

/// Handle POST /skip - Jump to the next session in the cycle
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.engine.skip();
    state.record_action("skip");
    Json(ApiResponse::from_snapshot(
        "Skipped to the next session".to_string(),
        state.engine.snapshot(),
    ))
}

/// Handle GET /status - Return the full timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.engine.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        formatted_time: snapshot.formatted_time(),
        progress: snapshot.progress(),
        timer: snapshot,
        settings: state.settings.snapshot(),
        notifications_available: state.notifier.check_authorization(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /settings - Current persisted settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse::current(&state.settings))
}

/// Handle PUT /settings - Partial settings update
///
/// Values outside the supported ranges are clamped; the response reports
/// the effective values.
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Json<SettingsResponse> {
    if let Some(minutes) = update.work_minutes {
        state.settings.set_work_minutes(minutes);
    }
    if let Some(minutes) = update.short_break_minutes {
        state.settings.set_short_break_minutes(minutes);
    }
    if let Some(minutes) = update.long_break_minutes {
        state.settings.set_long_break_minutes(minutes);
    }
    if let Some(style) = update.view_style {
        state.settings.set_view_style(style);
    }
    state.record_action("settings-update");
    Json(SettingsResponse::current(&state.settings))
}

/// Handle POST /settings/reset - Restore default durations
pub async fn reset_settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    state.settings.reset_to_defaults();
    state.record_action("settings-reset");
    Json(SettingsResponse::current(&state.settings))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
