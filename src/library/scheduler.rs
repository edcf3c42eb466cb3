use crate::library::clock::interface::Clock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Single-shot timer for the capture loop.
///
/// A tick has to be re-armed after every cycle, so the next capture can only
/// be scheduled once the previous one has finished. Arming again replaces the
/// pending deadline; at most one tick is ever pending.
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    due: Option<Instant>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, due: None }
    }

    pub fn schedule_in(&mut self, delay: Duration) {
        self.due = Some(self.clock.now() + delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Time left before the pending tick fires, `None` when nothing is armed.
    pub fn time_until_due(&self) -> Option<Duration> {
        self.due
            .map(|due| due.saturating_duration_since(self.clock.now()))
    }

    /// Disarms and returns true if the pending tick is due.
    pub fn take_due(&mut self) -> bool {
        match self.due {
            Some(due) if self.clock.now() >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
