//! Pomodoro timer state machine
//!
//! All mutation goes through one mutex-guarded record; critical sections are
//! short and never held across await points. The engine owns the handles of
//! its background tasks (countdown, deferred session advance, settings
//! listener) and aborts them whenever the state they serve is left.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::session::{SessionType, TimerSnapshot, TimerState};
use crate::services::{NotificationService, SoundService};
use crate::settings::TimerSettings;
use crate::tasks;

/// A long break follows every fourth completed work session
const SESSIONS_PER_LONG_BREAK: u32 = 4;

/// Outcome of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// One second consumed, countdown continues
    Ticked,
    /// The session finished on this tick
    Completed,
    /// The timer was no longer running; the tick was stale
    Ignored,
}

/// The mutable timer record
#[derive(Debug)]
struct EngineState {
    state: TimerState,
    session: SessionType,
    time_remaining_secs: u64,
    /// Length the running session started from; progress is measured
    /// against this even if the configured duration changes mid-session
    session_length_secs: u64,
    paused_remaining_secs: u64,
    completed_work_sessions: u32,
}

impl EngineState {
    fn new(settings: &TimerSettings) -> Self {
        let length = settings.duration_secs(SessionType::Work);
        Self {
            state: TimerState::Idle,
            session: SessionType::Work,
            time_remaining_secs: length,
            session_length_secs: length,
            paused_remaining_secs: 0,
            completed_work_sessions: 0,
        }
    }

    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            session: self.session,
            time_remaining_seconds: self.time_remaining_secs,
            session_length_seconds: self.session_length_secs,
            completed_work_sessions: self.completed_work_sessions,
        }
    }

    /// Move to the next session in the cycle and reload its duration
    fn advance(&mut self, settings: &TimerSettings) {
        self.state = TimerState::Idle;
        self.session = match self.session {
            SessionType::Work => {
                if self.completed_work_sessions > 0
                    && self.completed_work_sessions % SESSIONS_PER_LONG_BREAK == 0
                {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Work,
        };
        let length = settings.duration_secs(self.session);
        self.session_length_secs = length;
        self.time_remaining_secs = length;
        self.paused_remaining_secs = 0;
    }
}

/// Pomodoro timer engine
///
/// Operations are total: calling one in a state it does not apply to is a
/// logged no-op, never an error. Side effects go through the injected sound
/// and notification services.
pub struct TimerEngine {
    inner: Mutex<EngineState>,
    /// Countdown task handle; at most one live countdown exists at a
    /// time, and a finished task's handle may linger until replaced
    countdown: Mutex<Option<JoinHandle<()>>>,
    /// Deferred session-advance handle, armed while Completed
    pending_advance: Mutex<Option<JoinHandle<()>>>,
    settings_listener: Mutex<Option<JoinHandle<()>>>,
    settings: Arc<TimerSettings>,
    sound: Arc<dyn SoundService>,
    notifier: Arc<dyn NotificationService>,
    update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _update_rx: watch::Receiver<TimerSnapshot>,
    weak_self: Weak<TimerEngine>,
}

impl TimerEngine {
    /// Create an engine on a fresh work session and start listening for
    /// settings changes. Must be called from within the tokio runtime.
    pub fn new(
        settings: Arc<TimerSettings>,
        sound: Arc<dyn SoundService>,
        notifier: Arc<dyn NotificationService>,
    ) -> Arc<Self> {
        let initial = EngineState::new(&settings);
        let (update_tx, update_rx) = watch::channel(initial.snapshot());
        let settings_rx = settings.subscribe();

        let engine = Arc::new_cyclic(|weak: &Weak<TimerEngine>| Self {
            inner: Mutex::new(initial),
            countdown: Mutex::new(None),
            pending_advance: Mutex::new(None),
            settings_listener: Mutex::new(None),
            settings,
            sound,
            notifier,
            update_tx,
            _update_rx: update_rx,
            weak_self: weak.clone(),
        });

        let listener = tokio::spawn(tasks::settings_watch_task(
            Arc::downgrade(&engine),
            settings_rx,
        ));
        lock_slot(&engine.settings_listener).replace(listener);

        engine
    }

    /// Begin or resume the countdown
    ///
    /// Resuming from Paused keeps the frozen remaining time; starting from
    /// Idle or Completed begins the current session at its full configured
    /// duration. Ignored while already Running.
    pub fn start(&self) {
        self.cancel_pending_advance();

        let snapshot = {
            let mut st = self.lock_inner();
            match st.state {
                TimerState::Running => {
                    debug!("Start ignored, timer already running");
                    return;
                }
                TimerState::Paused => {
                    st.time_remaining_secs = st.paused_remaining_secs;
                }
                TimerState::Idle | TimerState::Completed => {
                    let length = self.settings.duration_secs(st.session);
                    st.session_length_secs = length;
                    st.time_remaining_secs = length;
                }
            }
            st.state = TimerState::Running;
            st.snapshot()
        };

        info!(
            "Starting {} session with {} on the clock",
            snapshot.session.as_str(),
            snapshot.formatted_time()
        );
        self.spawn_countdown();
        self.sound.play_start();
        self.sound.light_impact();
        self.publish(snapshot);
    }

    /// Freeze the countdown, keeping the remaining time for a later resume.
    /// Only applies while Running.
    pub fn pause(&self) {
        let snapshot = {
            let mut st = self.lock_inner();
            if st.state != TimerState::Running {
                debug!("Pause ignored, timer is {}", st.state.as_str());
                return;
            }
            st.paused_remaining_secs = st.time_remaining_secs;
            st.state = TimerState::Paused;
            st.snapshot()
        };

        self.stop_countdown();
        info!(
            "Paused {} session with {} remaining",
            snapshot.session.as_str(),
            snapshot.formatted_time()
        );
        self.sound.play_pause();
        self.sound.light_impact();
        self.publish(snapshot);
    }

    /// Abandon any countdown and return to an idle session of the same kind
    /// at its full configured duration
    pub fn reset(&self) {
        self.stop_countdown();
        self.cancel_pending_advance();

        let snapshot = {
            let mut st = self.lock_inner();
            st.state = TimerState::Idle;
            let length = self.settings.duration_secs(st.session);
            st.session_length_secs = length;
            st.time_remaining_secs = length;
            st.paused_remaining_secs = 0;
            st.snapshot()
        };

        info!("Timer reset to a fresh {} session", snapshot.session.as_str());
        self.sound.play_reset();
        self.publish(snapshot);
    }

    /// Jump straight to the next session in the cycle without completion
    /// credit, sounds, or notifications
    pub fn skip(&self) {
        self.stop_countdown();
        self.cancel_pending_advance();

        let snapshot = {
            let mut st = self.lock_inner();
            st.advance(&self.settings);
            st.snapshot()
        };

        info!("Skipped ahead to a {} session", snapshot.session.as_str());
        self.publish(snapshot);
    }

    /// Consume one second of the running session
    ///
    /// A session of N seconds completes on the tick after remaining reaches
    /// zero, N+1 ticks from start. Completion flips the state to Completed,
    /// credits a finished work session, fires the completion hooks, and arms
    /// the deferred advance to the next session.
    pub(crate) fn tick(&self) -> TickOutcome {
        let mut st = self.lock_inner();
        if st.state != TimerState::Running {
            debug!("Tick ignored, timer is {}", st.state.as_str());
            return TickOutcome::Ignored;
        }

        if st.time_remaining_secs > 0 {
            st.time_remaining_secs -= 1;
            let snapshot = st.snapshot();
            drop(st);
            self.publish(snapshot);
            return TickOutcome::Ticked;
        }

        st.state = TimerState::Completed;
        let finished = st.session;
        if finished.is_work() {
            st.completed_work_sessions += 1;
        }
        let completed = st.completed_work_sessions;
        let snapshot = st.snapshot();
        drop(st);

        info!(
            "{} session complete, {} work sessions finished",
            finished.title(),
            completed
        );
        // The countdown slot is not touched here; a concurrent start()
        // may already have stored a replacement handle in it
        self.sound.play_complete();
        self.sound.success_feedback();
        self.notifier.send_completion(finished, completed);
        self.schedule_advance();
        self.publish(snapshot);
        TickOutcome::Completed
    }

    /// Deferred follow-up to a completion; a stale timer that fires after
    /// the user already acted is dropped by the Completed guard
    pub(crate) fn advance_session(&self) {
        let snapshot = {
            let mut st = self.lock_inner();
            if st.state != TimerState::Completed {
                debug!("Session advance skipped, timer is {}", st.state.as_str());
                return;
            }
            st.advance(&self.settings);
            st.snapshot()
        };

        info!(
            "Up next: {} session ({})",
            snapshot.session.as_str(),
            snapshot.formatted_time()
        );
        self.publish(snapshot);
    }

    /// Refresh an idle timer after a settings change. Running and paused
    /// sessions keep the duration they started from.
    pub(crate) fn apply_settings_change(&self) {
        let snapshot = {
            let mut st = self.lock_inner();
            if st.state != TimerState::Idle {
                debug!("Duration change noted, timer is {}", st.state.as_str());
                return;
            }
            let length = self.settings.duration_secs(st.session);
            st.session_length_secs = length;
            st.time_remaining_secs = length;
            st.snapshot()
        };

        debug!("Idle timer refreshed to {}", snapshot.formatted_time());
        self.publish(snapshot);
    }

    /// Get a copy of the current timer state
    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock_inner().snapshot()
    }

    /// Watch for timer updates
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.update_tx.subscribe()
    }

    fn lock_inner(&self) -> MutexGuard<'_, EngineState> {
        // A poisoned lock still holds a consistent record
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Replace the countdown task, aborting any previous one
    fn spawn_countdown(&self) {
        let task = tokio::spawn(tasks::countdown_task(self.weak_self.clone()));
        if let Some(previous) = lock_slot(&self.countdown).replace(task) {
            previous.abort();
        }
    }

    fn stop_countdown(&self) {
        if let Some(task) = lock_slot(&self.countdown).take() {
            task.abort();
        }
    }

    fn schedule_advance(&self) {
        let task = tokio::spawn(tasks::advance_delay(self.weak_self.clone()));
        if let Some(previous) = lock_slot(&self.pending_advance).replace(task) {
            previous.abort();
        }
    }

    fn cancel_pending_advance(&self) {
        if let Some(task) = lock_slot(&self.pending_advance).take() {
            task.abort();
            debug!("Cancelled pending session advance");
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        for slot in [&self.countdown, &self.pending_advance, &self.settings_listener] {
            if let Some(task) = lock_slot(slot).take() {
                task.abort();
            }
        }
    }
}

fn lock_slot(slot: &Mutex<Option<JoinHandle<()>>>) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
