//! Countdown and session-advance background tasks

use std::{sync::Weak, time::Duration};

use tokio::time::sleep;
use tracing::debug;

use crate::state::{TickOutcome, TimerEngine};

/// Pause between a session completing and the cycle moving on
const SESSION_ADVANCE_DELAY: Duration = Duration::from_secs(1);

/// Drive the engine's countdown, one tick per second
///
/// The engine holds this task's handle and aborts it whenever the timer
/// leaves Running; the task also stops on its own when the session
/// completes, when a tick lands after the state already changed, or when
/// the engine is gone. Holding only a weak reference keeps an abandoned
/// engine collectable.
pub(crate) async fn countdown_task(engine: Weak<TimerEngine>) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick resolves immediately; consume it so the first
    // decrement lands a full second after start
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(engine) = engine.upgrade() else {
            debug!("Countdown stopping, engine is gone");
            break;
        };
        match engine.tick() {
            TickOutcome::Ticked => {}
            TickOutcome::Completed | TickOutcome::Ignored => break,
        }
    }
}

/// Wait out the post-completion pause, then move the cycle along
///
/// The engine holds this task's handle and aborts it if the user acts
/// before the delay elapses; the advance itself re-checks that the timer
/// is still Completed.
pub(crate) async fn advance_delay(engine: Weak<TimerEngine>) {
    sleep(SESSION_ADVANCE_DELAY).await;
    if let Some(engine) = engine.upgrade() {
        engine.advance_session();
    }
}
