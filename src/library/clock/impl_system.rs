use crate::library::clock::interface::Clock;
use chrono::{DateTime, Utc};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ClockSystem;

impl ClockSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for ClockSystem {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
