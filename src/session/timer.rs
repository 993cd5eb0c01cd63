//! Session countdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::session::machine::Event;

/// A running countdown owned by one session.
///
/// Emits `seconds` ticks, one per `period`, each stamped with the session
/// id. Dropping the handle cancels the countdown; no tick is sent after that.
#[derive(Debug)]
pub struct Countdown {
    session_id: Uuid,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Start ticking into `events`. Must be called inside a tokio runtime.
    pub fn start(
        session_id: Uuid,
        seconds: u64,
        period: Duration,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        debug!(%session_id, seconds, "countdown started");
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            for _ in 0..seconds {
                interval.tick().await;
                if events.send(Event::Tick { session_id }).is_err() {
                    break;
                }
            }
        });
        Self { session_id, task }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn cancel(self) {
        debug!(session_id = %self.session_id, "countdown cancelled");
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
