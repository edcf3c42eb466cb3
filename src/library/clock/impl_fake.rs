use crate::library::clock::interface::Clock;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ClockFake {
    origin: Instant,
    wall_origin: DateTime<Utc>,
    elapsed: Arc<Mutex<Duration>>,
}

impl ClockFake {
    pub fn new() -> Self {
        let wall_origin = Utc
            .with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Self {
            origin: Instant::now(),
            wall_origin,
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = match self.elapsed.lock() {
            Ok(elapsed) => elapsed,
            Err(poisoned) => poisoned.into_inner(),
        };
        *elapsed += by;
    }

    fn elapsed(&self) -> Duration {
        match self.elapsed.lock() {
            Ok(elapsed) => *elapsed,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Default for ClockFake {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ClockFake {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.elapsed()).unwrap_or(chrono::Duration::zero());
        self.wall_origin + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_both_clocks() {
        let clock = ClockFake::new();
        let start = clock.now();
        let wall_start = clock.wall_time();

        clock.clone().advance(Duration::from_millis(1500));

        assert_eq!(clock.now() - start, Duration::from_millis(1500));
        assert_eq!(
            (clock.wall_time() - wall_start).num_milliseconds(),
            1500
        );
    }
}
