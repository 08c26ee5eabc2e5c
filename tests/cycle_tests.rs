//! End-to-end cadence tests driving the public timer API

use std::sync::{Arc, Mutex};
use std::time::Duration;

use take_five::{
    NotificationService, SessionType, SoundService, TimerEngine, TimerSettings, TimerState,
};
use tempfile::TempDir;
use tokio::time::sleep;

/// Records every hook the engine fires, standing in for both services
#[derive(Default)]
struct Hooks {
    sounds: Mutex<Vec<&'static str>>,
    notices: Mutex<Vec<(SessionType, u32)>>,
}

impl SoundService for Hooks {
    fn play_start(&self) {
        self.sounds.lock().unwrap().push("start");
    }
    fn play_pause(&self) {
        self.sounds.lock().unwrap().push("pause");
    }
    fn play_reset(&self) {
        self.sounds.lock().unwrap().push("reset");
    }
    fn play_complete(&self) {
        self.sounds.lock().unwrap().push("complete");
    }
    fn light_impact(&self) {
        self.sounds.lock().unwrap().push("light_impact");
    }
    fn success_feedback(&self) {
        self.sounds.lock().unwrap().push("success_feedback");
    }
}

impl NotificationService for Hooks {
    fn request_authorization(&self) {}
    fn check_authorization(&self) -> bool {
        true
    }
    fn send_completion(&self, session: SessionType, completed_work_sessions: u32) {
        self.notices
            .lock()
            .unwrap()
            .push((session, completed_work_sessions));
    }
    fn cancel_all(&self) {}
}

fn build_engine() -> (Arc<TimerEngine>, Arc<TimerSettings>, Arc<Hooks>, TempDir) {
    let dir = TempDir::new().unwrap();
    let settings = Arc::new(TimerSettings::load(dir.path().join("settings.json")).unwrap());
    let hooks = Arc::new(Hooks::default());
    let engine = TimerEngine::new(settings.clone(), hooks.clone(), hooks.clone());
    (engine, settings, hooks, dir)
}

/// Start the pending session and wait out its countdown, the completing
/// tick, and the deferred advance to the next session
async fn finish_current_session(engine: &Arc<TimerEngine>) {
    let length = engine.snapshot().time_remaining_seconds;
    engine.start();
    sleep(Duration::from_millis(length * 1000 + 2500)).await;
}

#[tokio::test(start_paused = true)]
async fn four_work_sessions_walk_the_full_cadence() {
    let (engine, _settings, hooks, _dir) = build_engine();

    for completed in 1..=4u32 {
        assert_eq!(engine.snapshot().session, SessionType::Work);
        finish_current_session(&engine).await;

        let brk = engine.snapshot();
        let expected_break = if completed == 4 {
            SessionType::LongBreak
        } else {
            SessionType::ShortBreak
        };
        let expected_secs = if completed == 4 { 15 * 60 } else { 5 * 60 };
        assert_eq!(brk.state, TimerState::Idle);
        assert_eq!(brk.session, expected_break);
        assert_eq!(brk.time_remaining_seconds, expected_secs);
        assert_eq!(brk.completed_work_sessions, completed);

        finish_current_session(&engine).await;
        let back = engine.snapshot();
        assert_eq!(back.state, TimerState::Idle);
        assert_eq!(back.session, SessionType::Work);
        assert_eq!(back.completed_work_sessions, completed);
    }

    // Every completion sent exactly one notification with the running count
    let notices = hooks.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 8);
    assert_eq!(notices[0], (SessionType::Work, 1));
    assert_eq!(notices[1], (SessionType::ShortBreak, 1));
    assert_eq!(notices[6], (SessionType::Work, 4));
    assert_eq!(notices[7], (SessionType::LongBreak, 4));
}

#[tokio::test(start_paused = true)]
async fn interruptions_never_lose_or_gain_time() {
    let (engine, settings, _hooks, _dir) = build_engine();
    settings.set_work_minutes(2);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(engine.snapshot().time_remaining_seconds, 120);

    engine.start();
    sleep(Duration::from_millis(30_500)).await;
    engine.pause();
    assert_eq!(engine.snapshot().time_remaining_seconds, 90);

    // Duration edits while paused wait for the next fresh session
    settings.set_work_minutes(5);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.snapshot().time_remaining_seconds, 90);

    engine.start();
    sleep(Duration::from_millis(89_500)).await;
    assert_eq!(engine.snapshot().time_remaining_seconds, 1);
    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(engine.snapshot().state, TimerState::Completed);

    sleep(Duration::from_millis(1_000)).await;
    let brk = engine.snapshot();
    assert_eq!(brk.state, TimerState::Idle);
    assert_eq!(brk.session, SessionType::ShortBreak);

    // The new work duration applies once the cycle returns to work
    engine.skip();
    let work = engine.snapshot();
    assert_eq!(work.session, SessionType::Work);
    assert_eq!(work.time_remaining_seconds, 5 * 60);
}
